//! Line-oriented menu for terminals where the full-screen interface is not
//! wanted (`--plain`). Input and output are generic so scripted sessions can
//! drive it.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Money;
use crate::store::Inventory;

use super::helpers::listing_row;

const MENU_PROMPT: &str = "(I)nventory, (A)dd, (R)emove, (P)ayment, (M)onth, e(X)it: ";

/// Run the menu loop until the user exits or input ends, then save the
/// inventory to `data_path`. A failed save is reported but does not turn
/// into an error: the session is over either way.
pub fn run_console<R: BufRead, W: Write>(
    inventory: &mut Inventory,
    data_path: &Path,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(
        output,
        "\nWelcome to the Boat Management System\n-------------------------------------"
    )?;

    loop {
        write!(output, "\n{MENU_PROMPT}")?;
        output.flush()?;

        let Some(line) = read_line(&mut input)? else {
            writeln!(output)?;
            break;
        };
        let Some(choice) = line.trim().chars().next() else {
            continue;
        };

        match choice.to_ascii_lowercase() {
            'i' => {
                inventory.sort_by_name();
                for boat in inventory.iter() {
                    writeln!(output, "{}", listing_row(boat))?;
                }
            }
            'a' => {
                let Some(record) = prompt(&mut input, &mut output, "Enter boat data (CSV): ")? else {
                    break;
                };
                if let Err(err) = inventory.add_record(&record) {
                    writeln!(output, "Error: {err}")?;
                    writeln!(output, "Format: Name,Length,Place,Extra,AmountOwed")?;
                }
            }
            'r' => {
                let Some(name) = prompt(&mut input, &mut output, "Enter boat name to remove: ")?
                else {
                    break;
                };
                if let Err(err) = inventory.remove(&name) {
                    writeln!(output, "{err}")?;
                }
            }
            'p' => {
                let Some(name) = prompt(&mut input, &mut output, "Enter boat name for payment: ")?
                else {
                    break;
                };
                if inventory.find(&name).is_none() {
                    writeln!(output, "No boat with that name")?;
                    continue;
                }
                let Some(raw) = prompt(&mut input, &mut output, "Enter payment amount: ")? else {
                    break;
                };
                let amount: Money = match raw.parse() {
                    Ok(amount) => amount,
                    Err(err) => {
                        writeln!(output, "Error: {err}")?;
                        continue;
                    }
                };
                match inventory.pay(&name, amount) {
                    Ok(payment) => writeln!(output, "Payment of ${} accepted.", payment.paid)?,
                    Err(err) => writeln!(output, "{err}")?,
                }
            }
            'm' => {
                inventory.apply_monthly_charges();
                writeln!(output, "Monthly charges applied.")?;
            }
            'x' => break,
            other => writeln!(output, "Invalid option '{other}'. Try again.")?,
        }
    }

    match inventory.save(data_path) {
        Ok(()) => writeln!(output, "Exiting the Boat Management System...")?,
        Err(err) => writeln!(output, "Error: {err}")?,
    }
    Ok(())
}

/// Read one line without its terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        debug!("console input closed");
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    read_line(input)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use super::*;

    fn run(inventory: &mut Inventory, script: &str) -> (String, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        let mut output = Vec::new();
        run_console(inventory, &path, Cursor::new(script.to_string()), &mut output).unwrap();
        let saved = fs::read_to_string(&path).unwrap_or_default();
        (String::from_utf8(output).unwrap(), saved)
    }

    #[test]
    fn scripted_session_updates_and_saves() {
        let mut inventory = Inventory::default();
        let script = "a\nSea Breeze,30,slip,12,0\nA\nDry Dock,22,land,C,10\nm\np\nsea breeze\n75\ni\nx\n";
        let (output, saved) = run(&mut inventory, script);

        assert!(output.contains("Monthly charges applied."));
        assert!(output.contains("Payment of $75.00 accepted."));
        assert!(output.contains("Exiting the Boat Management System..."));
        assert_eq!(
            saved,
            "Dry Dock,22,land,C,318.00\nSea Breeze,30,slip,12,300.00\n"
        );
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let mut inventory = Inventory::default();
        inventory.add_record("Alpha,20,slip,1,10").unwrap();
        let script = "a\nBad,0,slip,1,0\nr\nBravo\np\nGhost\np\nalpha\n20\nz\nx\n";
        let (output, _) = run(&mut inventory, script);

        assert!(output.contains("Format: Name,Length,Place,Extra,AmountOwed"));
        assert!(output.contains("No boat with that name"));
        assert!(output.contains("That is more than the amount owed, $10.00."));
        assert!(output.contains("Invalid option 'z'. Try again."));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn end_of_input_saves_like_exit() {
        let mut inventory = Inventory::default();
        let (output, saved) = run(&mut inventory, "a\nAlpha,20,storage,4,1.5\n");
        assert!(output.contains("Exiting"));
        assert_eq!(saved, "Alpha,20,storage,4,1.50\n");
    }

    #[test]
    fn remove_by_name() {
        let mut inventory = Inventory::default();
        inventory.add_record("Alpha,20,slip,1,0").unwrap();
        inventory.add_record("Bravo,20,slip,2,0").unwrap();
        let (_, saved) = run(&mut inventory, "r\nALPHA\nx\n");
        assert_eq!(saved, "Bravo,20,slip,2,0.00\n");
    }
}
