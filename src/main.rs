use anyhow::Result;
use rlox::lox::{config::Config, Lox, Outcome, EX_USAGE};
use std::{env, path::Path, process};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut lox = Lox::new(Config::from_env());

    match args.as_slice() {
        [] => lox.run_prompt()?,
        [path] => {
            let outcome = lox.run_file(Path::new(path))?;
            if outcome != Outcome::Success {
                process::exit(outcome.exit_code());
            }
        }
        _ => {
            println!("Usage: rlox [script]");
            process::exit(EX_USAGE);
        }
    }

    Ok(())
}
