//! Amount input buffer.
//!
//! Lives independently of the mutation slot: submitting clears it right away,
//! whatever the mutation later resolves to.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountBuffer {
    text: String,
}

impl AmountBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_raw_text_until_cleared() {
        let mut buffer = AmountBuffer::new();
        buffer.set("1x");
        assert_eq!(buffer.as_str(), "1x");
        buffer.set(" 12");
        assert_eq!(buffer.as_str(), " 12");
        buffer.clear();
        assert_eq!(buffer.as_str(), "");
    }
}
