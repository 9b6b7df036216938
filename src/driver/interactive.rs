//! Interactive menu mode: numbered options over buffered stdin, matching the
//! reference REPL's shape (1 insert, 2 delete, 3 equality search, 4 range search, 5
//! dump, 6 quit). EOF or a parse error on the menu selection exits cleanly.

use std::io::{self, BufRead, Write};

use super::Engine;
use crate::record::Record;

const MENU: &str = "\
1) insert
2) delete
3) search
4) range
5) dump
6) quit
> ";

/// Read one line from `input`, returning `None` on EOF.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    let n = input.read_line(&mut line)?;
    if n == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

fn read_ints<R: BufRead>(input: &mut R, prompt: &str, count: usize) -> io::Result<Option<Vec<i32>>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let Some(line) = read_line(input)? else {
        return Ok(None);
    };
    let values: Result<Vec<i32>, _> = line.split_whitespace().map(|s| s.parse::<i32>()).collect();
    match values {
        Ok(v) if v.len() == count => Ok(Some(v)),
        _ => {
            eprintln!("expected {count} integer(s)");
            Ok(Some(Vec::new()))
        }
    }
}

/// Run the interactive menu loop against `engine`, reading from `input` and writing to
/// stdout/stderr. Returns once the user quits or stdin reaches EOF.
pub fn run_interactive<R: BufRead>(engine: &mut Engine, input: &mut R) -> io::Result<()> {
    loop {
        print!("{MENU}");
        io::stdout().flush()?;

        let Some(choice) = read_line(input)? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let num_fields = engine.num_fields();
                match read_ints(input, &format!("fields ({num_fields} ints): "), num_fields)? {
                    None => return Ok(()),
                    Some(fields) if fields.len() == num_fields => match engine.insert(Record::new(fields)) {
                        Ok(()) => println!("OK"),
                        Err(e) => eprintln!("ERROR: {e}"),
                    },
                    Some(_) => {}
                }
            }
            "2" => match read_ints(input, "key: ", 1)? {
                None => return Ok(()),
                Some(v) if v.len() == 1 => println!("OK deleted={}", engine.delete(v[0])),
                Some(_) => {}
            },
            "3" => match read_ints(input, "key: ", 1)? {
                None => return Ok(()),
                Some(v) if v.len() == 1 => match engine.search(v[0]) {
                    Some(record) => println!("OK {:?}", record.fields()),
                    None => println!("OK not_found"),
                },
                Some(_) => {}
            },
            "4" => match read_ints(input, "lo hi: ", 2)? {
                None => return Ok(()),
                Some(v) if v.len() == 2 => {
                    for record in engine.range(v[0], v[1]) {
                        println!("{:?}", record.fields());
                    }
                }
                Some(_) => {}
            },
            "5" => println!("{}", engine.dump_text()),
            "6" => return Ok(()),
            other => eprintln!("unrecognized menu option: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LhtConfig;
    use std::io::Cursor;

    #[test]
    fn quit_option_ends_loop() {
        let mut engine = Engine::new_lht(&LhtConfig::new(2, 40));
        let mut input = Cursor::new(b"6\n".to_vec());
        run_interactive(&mut engine, &mut input).unwrap();
    }

    #[test]
    fn eof_ends_loop_cleanly() {
        let mut engine = Engine::new_lht(&LhtConfig::new(2, 40));
        let mut input = Cursor::new(Vec::new());
        run_interactive(&mut engine, &mut input).unwrap();
    }

    #[test]
    fn insert_then_search_round_trip() {
        let mut engine = Engine::new_lht(&LhtConfig::new(2, 40));
        let mut input = Cursor::new(b"1\n3 30\n3\n3\n6\n".to_vec());
        run_interactive(&mut engine, &mut input).unwrap();
        assert_eq!(engine.search(3).unwrap().fields(), &[3, 30]);
    }
}
