//! Token channel
//!
//!     Runs a [`Lexer`] on its own thread and hands its items to a single consumer through a
//!     bounded channel holding at most one item. The producer blocks until the consumer takes
//!     the previous item, so lexing never runs more than one item ahead of the caller.
//!
//!     Consumers pull either synchronously, through [`Iterator`] or [`TokenChannel::next_item`],
//!     or from async code with [`TokenChannel::recv`]. Closing the channel, explicitly with
//!     [`TokenChannel::cancel`] or by dropping it, stops the producer at its next send.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

use crate::rst::config::LexerOptions;
use crate::rst::error::LexError;
use crate::rst::lexing::state_machine::Lexer;
use crate::rst::token::Item;

/// Receiving end of a lexer running on a producer thread
#[derive(Debug)]
pub struct TokenChannel {
    receiver: Receiver<Item>,
    producer: Option<JoinHandle<()>>,
}

impl TokenChannel {
    /// Starts lexing `text` on a new thread.
    pub fn spawn(name: impl Into<String>, text: impl Into<String>) -> Result<Self, LexError> {
        Self::spawn_with_options(name, text, LexerOptions::default())
    }

    pub fn spawn_with_options(
        name: impl Into<String>,
        text: impl Into<String>,
        options: LexerOptions,
    ) -> Result<Self, LexError> {
        let name = name.into();
        let text = text.into();
        let (sender, receiver) = mpsc::channel(1);

        let producer = thread::Builder::new()
            .name(format!("rstlex:{}", name))
            .spawn(move || produce(Lexer::with_options(name, &text, options), sender))
            .map_err(LexError::Spawn)?;

        Ok(TokenChannel {
            receiver,
            producer: Some(producer),
        })
    }

    /// Blocks until the next item arrives. `None` once the stream has ended or was cancelled.
    ///
    /// # Panics
    ///
    /// When called from within an async runtime; use [`TokenChannel::recv`] there.
    pub fn next_item(&mut self) -> Option<Item> {
        self.receiver.blocking_recv()
    }

    /// Waits for the next item.
    pub async fn recv(&mut self) -> Option<Item> {
        self.receiver.recv().await
    }

    /// Stops the producer. Items already buffered can still be received.
    pub fn cancel(&mut self) {
        debug!("token channel cancelled");
        self.receiver.close();
    }
}

fn produce(lexer: Lexer, sender: Sender<Item>) {
    let name = lexer.name().to_string();
    for item in lexer {
        let terminal = item.is_terminal();
        if sender.blocking_send(item).is_err() {
            debug!(name = %name, "consumer went away, stopping producer");
            return;
        }
        if terminal {
            break;
        }
    }
    debug!(name = %name, "producer finished");
}

impl Iterator for TokenChannel {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        self.next_item()
    }
}

impl Drop for TokenChannel {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(producer) = self.producer.take() {
            if producer.join().is_err() {
                warn!("token producer panicked");
            }
        }
    }
}
