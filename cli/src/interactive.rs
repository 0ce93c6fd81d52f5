use crate::formatter::Formatter;
use anyhow::{Context, Result};
use chainer::{parse_item, KnowledgeBase};
use inquire::Text;

const HELP: &str = "Commands:
  assert ITEM    add a fact or rule, e.g. assert rule: ((isa ?x block)) -> (movable ?x)
  ask ITEM       query facts, e.g. ask (movable ?x)
  retract ITEM   withdraw an asserted fact
  show           print every fact and rule with justifications
  help           show this message
  quit           leave the prompt
";

#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub fn run_interactive(kb: &mut KnowledgeBase) -> Result<()> {
    println!("Type `help` for commands, `quit` to leave.");
    loop {
        let line = Text::new("chainer>")
            .with_help_message("assert | ask | retract | show | quit")
            .prompt()
            .context("Failed to read command")?;

        match execute(kb, &line) {
            Ok(Reply::Output(text)) => print!("{}", text),
            Ok(Reply::Quit) => return Ok(()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Run one prompt line against `kb`
pub fn execute(kb: &mut KnowledgeBase, line: &str) -> Result<Reply> {
    let formatter = Formatter::default();
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    match command {
        "" => Ok(Reply::Output(String::new())),
        "quit" | "exit" => Ok(Reply::Quit),
        "help" => Ok(Reply::Output(HELP.to_string())),
        "show" => Ok(Reply::Output(formatter.format_knowledge_base(&kb.snapshot()))),
        "assert" => {
            let item = parse_item(rest)?;
            let before = kb.len();
            kb.assert(item.clone());
            Ok(Reply::Output(format!(
                "Asserted {} ({} new item(s))\n",
                item,
                kb.len() - before
            )))
        }
        "ask" => {
            let query = parse_item(rest)?;
            let answers = kb.ask(query.clone());
            Ok(Reply::Output(formatter.format_answers(&query, &answers)))
        }
        "retract" => {
            let item = parse_item(rest)?;
            let retraction = kb.retract(item.clone());
            Ok(Reply::Output(formatter.format_retraction(&item, &retraction)))
        }
        other => anyhow::bail!("Unknown command '{}'. Type `help` for commands.", other),
    }
}
