#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub u128);
