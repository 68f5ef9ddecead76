//
// SPDX-License-Identifier: MIT
//

//! The interactive command shell (§4.8, ambient): a line-oriented REPL over
//! stdin. A small hand-rolled tokenizer is enough for three whitespace-
//! delimited commands, no grammar library needed.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::forward;
use crate::log::Event;
use crate::node::NodeId;
use crate::shared::Ctx;
use crate::timer;
use crate::SharedCtx;

pub enum Command {
    Send { dst: NodeId, text: String },
    Table,
    Quit,
    Unknown(String),
}

/// Parses one line of input into a [`Command`]. Blank lines parse to
/// `None`: the shell simply reads the next line.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line == "sair" {
        return Some(Command::Quit);
    }
    if line == "tabela" {
        return Some(Command::Table);
    }
    if let Some(rest) = line.strip_prefix("enviar ") {
        let rest = rest.trim_start();
        return match rest.split_once(' ') {
            Some((dst, text)) if !dst.is_empty() => Some(Command::Send {
                dst: NodeId::new(dst),
                text: text.to_string(),
            }),
            _ => Some(Command::Unknown(line.to_string())),
        };
    }

    Some(Command::Unknown(line.to_string()))
}

/// Reads commands from stdin until `sair`, EOF, or shutdown, dispatching
/// each to the forwarding plane or the table display.
pub async fn run(ctx: SharedCtx) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shutdown = ctx.shutdown_rx();

    loop {
        let next = tokio::select! {
            result = lines.next_line() => result,
            _ = shutdown.changed() => return,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => {
                // EOF on stdin: treat it the same as an explicit `sair`.
                ctx.shut_down();
                return;
            }
            Err(_) => continue,
        };

        match parse(&line) {
            None => {}
            Some(Command::Quit) => {
                ctx.shut_down();
                return;
            }
            Some(Command::Table) => timer::print_table(&ctx),
            Some(Command::Send { dst, text }) => {
                forward::originate(&ctx, dst, text).await;
            }
            Some(Command::Unknown(cmd)) => Event::UnknownCommand(&cmd).log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_enviar_with_a_multi_word_body() {
        match parse("enviar C hello world").unwrap() {
            Command::Send { dst, text } => {
                assert_eq!(dst, NodeId::new("C"));
                assert_eq!(text, "hello world");
            }
            _ => panic!("expected Command::Send"),
        }
    }

    #[test]
    fn parses_tabela_and_sair() {
        assert!(matches!(parse("tabela"), Some(Command::Table)));
        assert!(matches!(parse("sair"), Some(Command::Quit)));
    }

    #[test]
    fn blank_line_parses_to_none() {
        assert!(parse("   ").is_none());
    }

    #[test]
    fn unrecognized_command_is_reported_not_panicked() {
        assert!(matches!(parse("xyzzy"), Some(Command::Unknown(_))));
        assert!(matches!(parse("enviar"), Some(Command::Unknown(_))));
        assert!(matches!(parse("enviar onlydst"), Some(Command::Unknown(_))));
    }
}
