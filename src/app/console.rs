use std::io::{self, BufRead, Write};

/// Line-based prompt/report boundary. The menu talks to the operator only
/// through this trait so tests can script the whole interaction.
pub trait Console {
    fn say(&mut self, message: &str);
    fn prompt_line(&mut self, prompt: &str) -> io::Result<String>;
}

pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, message: &str) {
        println!("{message}");
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
