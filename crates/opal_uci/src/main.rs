//! Line-based protocol binary. Reads commands from stdin, writes protocol
//! replies to stdout, and runs searches on a background thread so the loop
//! stays responsive to `halt` and `quit`.

mod session;

use std::io::{self, BufRead};

use anyhow::Result;

use crate::session::Session;

fn main() -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = line?;
        if !session.handle_line(line.trim())? {
            return Ok(());
        }
    }

    // stdin closed without an explicit quit.
    session.shutdown()
}
