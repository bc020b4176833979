use ipcgen_macros::service;

#[service]
#[derive(Debug, PartialEq)]
pub struct Bare;

#[service("acc:u0")]
#[derive(Debug, PartialEq)]
pub struct Named {
    user: u64,
}

#[service("fsp-srv", 8)]
#[derive(Debug, PartialEq)]
pub enum WithArgument {
    Open,
    Closed,
}

#[service("time:u",)]
pub struct TrailingComma;

#[test]
fn test_items_pass_through_unchanged() {
    assert_eq!(Bare, Bare);
    assert_eq!(Named { user: 7 }.user, 7);
    assert_ne!(WithArgument::Open, WithArgument::Closed);
    let _ = TrailingComma;
}
