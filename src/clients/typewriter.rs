use std::time::Duration;

/// Reveals text one character at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    delay: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl Typewriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Calls `render` with every growing prefix of `text`, waiting `delay`
    /// after each character. Prefixes always end on a `char` boundary.
    pub async fn type_out<F>(&self, text: &str, mut render: F)
    where
        F: FnMut(&str),
    {
        render("");
        for (start, ch) in text.char_indices() {
            render(&text[..start + ch.len_utf8()]);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}
