//! Renderer seam and the plain-text terminal renderer used by `ikb-chat`.

use std::io::{self, Write};

use crate::conversation::{ConversationLog, Message, Sender};

/// Draws conversation entries.
pub trait Renderer {
    fn render(&mut self, message: &Message) -> io::Result<()>;

    /// Called when a request starts (`true`) and when it resolves (`false`).
    fn waiting(&mut self, _pending: bool) -> io::Result<()> {
        Ok(())
    }
}

/// Writes each message as a labelled block. New entries always go to the
/// bottom of the stream, so the newest message is the one in view.
pub struct TerminalRenderer<W: Write> {
    out: W,
    drawn: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }

    /// Draw every entry appended to `log` since the previous call.
    pub fn sync(&mut self, log: &ConversationLog) -> io::Result<()> {
        for message in log.since(self.drawn) {
            self.render(message)?;
        }
        self.drawn = log.len();
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "you",
        Sender::Assistant => "assistant",
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, message: &Message) -> io::Result<()> {
        let mut lines = message.text().lines();
        let first = lines.next().unwrap_or_default();
        writeln!(self.out, "{}> {}", label(message.sender()), first)?;
        for line in lines {
            writeln!(self.out, "  {}", line)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    fn waiting(&mut self, pending: bool) -> io::Result<()> {
        if pending {
            writeln!(self.out, "(thinking...)")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
