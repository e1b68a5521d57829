use std::process::Command;

pub fn jsonmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsonmap"))
}
