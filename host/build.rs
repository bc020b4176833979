fn main() -> Result<(), ipcgen::GenerateError> {
    ipcgen::build::Builder::new()
        .output("user_interface.rs")
        .run()?;
    Ok(())
}
