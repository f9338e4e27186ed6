//! Replays captured serial input through the tokenizer.
//!
//! Run with `cargo run --example serial_commands`.

use serial_parse_text::{CommandParser, Tokenizer, TokenizerError};

const LINES: &[u8] =
    b"@ABCDEFGHIJKLAA@\n\nQQ:1007566569\r\nlovemengx@qq.com\n123456789#++++++.....";
const SINGLE_COMMAND: &[u8] = b"reg_w 0x01=0x20, 0x02= 0x15, 0x03=0x56";
const SESSION: &[u8] = b"wifi \"my wifi\",12345678\n\
    video udp,192.168.1.115,8000\n\
    reg_w 0x01=0x20, 0x02= 0x15, 0x03=0x56\n\
    reg_r 0x01,0x02,0x05,0x06\n\
    reboot\n";

fn print_token(label: &str, token: &[u8]) {
    println!("[{}] : {:<2}->[{}]", label, token.len(), String::from_utf8_lossy(token));
}

/// Newline splitting over a caller-supplied buffer
fn static_newline(input: &[u8]) -> Result<(), TokenizerError> {
    let mut buff = [0u8; 512];
    let mut tokenizer = Tokenizer::new(&mut buff[..])?;
    println!("total:{}  len:{}", tokenizer.total(), tokenizer.capacity());

    tokenizer.feed_lines(input, |line| print_token("parse", line));
    if tokenizer.finish() > 0 {
        print_token("finish", tokenizer.token());
    }
    Ok(())
}

/// Newline splitting over a heap region
fn dynamic_newline(input: &[u8]) -> Result<(), TokenizerError> {
    let mut tokenizer = Tokenizer::acquire(512)?;
    println!("total:{}  len:{}", tokenizer.total(), tokenizer.capacity());

    tokenizer.feed_lines(input, |line| print_token("parse", line));
    if tokenizer.finish() > 0 {
        print_token("finish", tokenizer.token());
    }

    tokenizer.release();
    Ok(())
}

/// Command name on ' ', then arguments on ',' with spaces ignored
fn static_divide(input: &[u8]) -> Result<(), TokenizerError> {
    let mut buff = [0u8; 512];
    let mut tokenizer = Tokenizer::new(&mut buff[..])?;
    tokenizer.set_delimiter(b' ');
    tokenizer.set_ignore(None);
    println!("total:{}  len:{}", tokenizer.total(), tokenizer.capacity());

    for &byte in input {
        if tokenizer.feed(byte).is_complete() {
            print_token("parse", tokenizer.token());
            tokenizer.set_delimiter(b',');
            tokenizer.set_ignore(b' ');
        }
    }
    if tokenizer.finish() > 0 {
        print_token("finish", tokenizer.token());
    }
    Ok(())
}

fn command_session(input: &[u8]) -> Result<(), TokenizerError> {
    let mut parser = CommandParser::new()?;
    for command in parser.parse(input) {
        println!("[command]: [{}]", command.name);
        for arg in &command.args {
            println!("[paramet]: [{}]", arg);
        }
        if let Ok(json) = command.to_json() {
            println!("[json]   : {}", json);
        }
        println!();
    }
    Ok(())
}

fn section(title: &str) {
    println!("------------------------------------");
    println!("{}", title);
    println!("------------------------------------");
}

fn main() -> Result<(), TokenizerError> {
    section("static memory newline example...");
    static_newline(LINES)?;

    section("dynamic memory newline example...");
    dynamic_newline(LINES)?;

    section("static memory divide example...");
    static_divide(SINGLE_COMMAND)?;

    section("command parse example...");
    command_session(SESSION)?;

    Ok(())
}
