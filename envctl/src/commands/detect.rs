use anyhow::Result;
use container_runtime::{detect, RunError, RuntimeKind};

pub fn execute() -> Result<()> {
    match detect() {
        RuntimeKind::None => Err(RunError::NoRuntimeFound.into()),
        runtime => {
            println!("{}", runtime);
            Ok(())
        }
    }
}
