//! Command dispatch against a [`Graph`].

use std::io::{self, BufRead, Write};

use reltrack::Graph;
use tracing::{debug, info};

use crate::command::{Command, CommandReader};
use crate::error::CommandResult;

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// `end` was seen.
    Stop,
}

/// Counters for one [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed.
    pub commands: usize,
    /// Report lines written.
    pub reports: usize,
    /// Whether the stream stopped at an explicit `end`.
    pub ended: bool,
}

/// Owns the graph and the output sink; executes commands one at a time.
pub struct Session<W> {
    graph: Graph,
    out: W,
    flush_reports: bool,
    summary: RunSummary,
}

impl<W: Write> Session<W> {
    /// Start a session on an empty graph.
    pub fn new(out: W) -> Self {
        Self::with_graph(Graph::new(), out)
    }

    /// Start a session on an existing graph.
    pub fn with_graph(graph: Graph, out: W) -> Self {
        Self {
            graph,
            out,
            flush_reports: false,
            summary: RunSummary::default(),
        }
    }

    /// Flush the sink after every report line (for interactive use).
    #[must_use]
    pub fn flush_reports(mut self, flush: bool) -> Self {
        self.flush_reports = flush;
        self
    }

    /// Apply one command.
    pub fn execute(&mut self, command: &Command) -> io::Result<Flow> {
        debug!(%command, "execute");
        self.summary.commands += 1;

        match command {
            Command::AddEntity(name) => {
                self.graph.add_entity(name);
            }
            Command::RemoveEntity(name) => {
                self.graph.remove_entity(name);
            }
            Command::AddRelation {
                source,
                destination,
                relation,
            } => {
                self.graph.add_edge(source, destination, relation);
            }
            Command::RemoveRelation {
                source,
                destination,
                relation,
            } => {
                self.graph.remove_edge(source, destination, relation);
            }
            Command::Report => {
                self.graph.report().write_to(&mut self.out)?;
                self.out.write_all(b"\n")?;
                if self.flush_reports {
                    self.out.flush()?;
                }
                self.summary.reports += 1;
            }
            Command::End => {
                self.summary.ended = true;
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// Execute commands from `input` until `end`, end of input, or an error.
    ///
    /// Output is flushed before returning, on success and on failure.
    pub fn run<R: BufRead>(&mut self, input: R) -> CommandResult<RunSummary> {
        let mut reader = CommandReader::new(input);

        let outcome = loop {
            let command = match reader.next_command() {
                Ok(Some(command)) => command,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };
            match self.execute(&command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break Ok(()),
                Err(e) => break Err(e.into()),
            }
        };

        self.out.flush()?;
        outcome?;

        info!(
            commands = self.summary.commands,
            reports = self.summary.reports,
            ended = self.summary.ended,
            "command stream finished"
        );
        Ok(self.summary)
    }

    /// The graph being edited.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Counters so far.
    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Give back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;

    #[test]
    fn test_execute_report() {
        let mut session = Session::new(Vec::new());
        for line in ["addent a", "addent b", "addrel a b r", "report"] {
            let flow = session.execute(&parse_command(line).unwrap()).unwrap();
            assert_eq!(flow, Flow::Continue);
        }
        assert_eq!(session.summary().reports, 1);
        assert_eq!(session.into_output(), b"r b 1;\n");
    }

    #[test]
    fn test_end_stops() {
        let mut session = Session::new(Vec::new());
        assert_eq!(session.execute(&Command::End).unwrap(), Flow::Stop);
        assert!(session.summary().ended);
    }

    #[test]
    fn test_run_stops_at_end() {
        let mut session = Session::new(Vec::new());
        let summary = session
            .run("addent a\nreport\nend\naddent b\nreport\n".as_bytes())
            .unwrap();
        assert_eq!(
            summary,
            RunSummary {
                commands: 3,
                reports: 1,
                ended: true
            }
        );
        assert!(!session.graph().entities().contains(&"b".into()));
        assert_eq!(session.into_output(), b"none\n");
    }
}
