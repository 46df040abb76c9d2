use std::{env::args, fs::read_to_string, io::Write, process::exit};

use rlox::{InterpretError, VM};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    match args().len() {
        1 => repl(),
        2 => run_file(&args().collect::<Vec<String>>()[1]),
        _ => {
            eprintln!("Usage: rlox [path]");
            exit(64);
        }
    }
}

fn repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut buf = String::new();
    let mut vm = VM::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        buf.clear();
        if std::io::stdin().read_line(&mut buf)? == 0 || buf == "\n" {
            println!("goodbye");
            return Ok(());
        }

        // errors are already reported by the VM
        let _ = vm.interpret(&buf);
    }
}

fn run_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_file(path);
    let mut vm = VM::new();

    match vm.interpret(&source) {
        Err(InterpretError::Compile(_)) => exit(65),
        Err(InterpretError::Runtime(_)) => exit(70),
        Ok(()) => Ok(()),
    }
}

fn read_file(path: &str) -> String {
    match read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading file: {}", e);
            exit(74);
        }
    }
}
