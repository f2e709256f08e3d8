//! Interactive recovery prompt.
//!
//! The re-prompt loop lives here, at the outermost shell; the core only
//! ever sees a parsed [`RecoveryChoice`].

use careerbank_core::{RecoveryChoice, RecoveryHandler, SchemaMismatch};
use std::io::{self, Write};

/// Prompts the operator on stdin for each mismatched collection.
///
/// Invalid input re-prompts indefinitely. If stdin closes, the mismatch
/// resolves as `Ignore` rather than spinning.
pub struct ConsolePrompt;

impl RecoveryHandler for ConsolePrompt {
    fn choose(&mut self, mismatch: &SchemaMismatch) -> RecoveryChoice {
        println!();
        println!("Header mismatch in {}", mismatch.path.display());
        println!("   Expected: {:?}", mismatch.expected);
        println!("   Found:    {:?}", mismatch.found);
        println!("   The file may be corrupted.");

        loop {
            println!();
            println!("How would you like to proceed?");
            println!("1. Load from backup");
            println!("2. Remake file");
            println!("3. Proceed without doing anything (not advisable)");
            print!("Selection: ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => {
                    eprintln!("input closed, proceeding without change");
                    return RecoveryChoice::Ignore;
                }
                Ok(_) => {}
            }

            match RecoveryChoice::parse(&line) {
                Ok(choice) => return choice,
                Err(error) => println!(
                    "{error}. Please type 1 to load from a backup, 2 to remake the file, \
                     or 3 to proceed without doing anything."
                ),
            }
        }
    }
}
