//! Interactive Transition Map Builder
//!
//! This example authors a transition map from the terminal. Each question
//! lists the allowed choices; answer with their numbers separated by spaces,
//! an empty line for the default, or `q` to abort.
//!
//! Key concepts:
//! - Implementing `SelectionProvider` over any I/O
//! - Rejected answers are asked again
//! - Aborting returns control to the caller
//!
//! Run with: cargo run --example interactive_builder

use fsm_graph::builder::{
    build_transition_map, parse_state_list, Answer, BuildError, SelectionProvider,
};
use fsm_graph::core::State;
use std::io::{self, BufRead, Write};

struct Terminal<R> {
    input: R,
}

impl<R: BufRead> Terminal<R> {
    fn ask(&mut self, question: &str, pool: &[State]) -> Answer {
        println!("{question}");
        for (i, state) in pool.iter().enumerate() {
            println!("  {}) {}", i + 1, state);
        }
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if self.input.read_line(&mut line).unwrap_or(0) == 0 || line.trim() == "q" {
            return Answer::Aborted;
        }

        let picked = line
            .split_whitespace()
            .filter_map(|n| n.parse::<usize>().ok())
            .filter_map(|n| n.checked_sub(1).and_then(|i| pool.get(i)).cloned())
            .collect();
        Answer::Selected(picked)
    }
}

impl<R: BufRead> SelectionProvider for Terminal<R> {
    fn choose_destinations(&mut self, source: &State, pool: &[State]) -> Answer {
        self.ask(&format!("Which states can \"{source}\" change to?"), pool)
    }

    fn choose_enter_from(&mut self, orphan: &State, pool: &[State]) -> Answer {
        self.ask(&format!("\"{orphan}\" is unreachable. Which states lead to it?"), pool)
    }

    fn rejected(&mut self, error: &BuildError) {
        println!("{error}");
    }
}

fn main() {
    println!("=== Interactive Transition Map Builder ===\n");

    let stdin = io::stdin();
    let mut terminal = Terminal { input: stdin.lock() };

    println!("List your states, separated by spaces:");
    let mut line = String::new();
    if terminal.input.read_line(&mut line).is_err() {
        return;
    }

    let states = match parse_state_list(&line) {
        Ok(states) => states,
        Err(error) => {
            println!("{error}");
            return;
        }
    };

    match build_transition_map(states, &mut terminal) {
        Ok(map) => match serde_json::to_string_pretty(&map) {
            Ok(json) => println!("\n{json}"),
            Err(error) => println!("{error}"),
        },
        Err(BuildError::Aborted) => println!("Aborted."),
        Err(error) => println!("{error}"),
    }

    println!("\n=== Example Complete ===");
}
