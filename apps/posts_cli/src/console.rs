//! Line-oriented terminal I/O shared by the shell loop and the dialogs.

use std::{
    io::{self, Write},
    sync::Mutex as StdMutex,
};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
    sync::Mutex,
};

type LineInput = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

pub struct Console {
    input: Mutex<LineInput>,
    output: StdMutex<Box<dyn Write + Send>>,
}

impl Console {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }

    pub fn new(
        input: impl AsyncBufRead + Send + Unpin + 'static,
        output: impl Write + Send + 'static,
    ) -> Self {
        let input: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(input);
        Self {
            input: Mutex::new(input.lines()),
            output: StdMutex::new(Box::new(output)),
        }
    }

    /// Next input line without its terminator, or `None` at end of input.
    pub async fn read_line(&self) -> Option<String> {
        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read terminal input");
                None
            }
        }
    }

    pub fn write(&self, text: &str) {
        let Ok(mut output) = self.output.lock() else {
            return;
        };
        let _ = output.write_all(text.as_bytes());
        let _ = output.flush();
    }

    pub fn write_line(&self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    pub async fn prompt(&self, label: &str) -> Option<String> {
        self.write(label);
        self.read_line().await
    }
}
