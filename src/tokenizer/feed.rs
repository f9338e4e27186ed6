//! Feeding bytes into the tokenizer
//!
//! Each call processes exactly one byte in O(1) and never allocates.
//! Delimiter mode applies, in order: quote toggling, ignore filtering,
//! leading-space removal, delimiter detection, case shift, then bounded
//! accumulation with a forced flush once the data area is full.

use log::trace;

use super::Tokenizer;
use crate::config::QUOTE;

/// Outcome of feeding one byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedResult {
    /// Token still accumulating
    Continue,
    /// Token boundary reached; holds the token length (terminator excluded)
    Complete(usize),
}

impl FeedResult {
    /// Token length, or 0 while accumulating
    pub fn len(self) -> usize {
        match self {
            FeedResult::Continue => 0,
            FeedResult::Complete(len) => len,
        }
    }

    /// Check if a token boundary was reached
    pub fn is_complete(self) -> bool {
        matches!(self, FeedResult::Complete(_))
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Tokenizer<S> {
    /// Feed one byte in delimiter mode.
    ///
    /// A quote byte toggles quoted mode and is dropped. Outside quotes the
    /// ignore byte is dropped. A space before the first stored byte is
    /// dropped. Only bytes surviving those rules can match the delimiter.
    pub fn feed(&mut self, byte: u8) -> FeedResult {
        if self.state.capacity == 0 {
            return FeedResult::Continue;
        }

        if self.discard(byte) {
            return FeedResult::Continue;
        }

        if byte == self.state.config.delimiter {
            return FeedResult::Complete(self.complete_token(true));
        }

        let byte = self.state.config.shift.apply(byte);
        self.accumulate(byte, true)
    }

    /// Feed one byte in newline mode.
    ///
    /// `\n` is the only boundary and a `\r` directly before it is stripped.
    /// Delimiter, ignore and quote handling do not apply; the shift does.
    pub fn feed_line(&mut self, byte: u8) -> FeedResult {
        if self.state.capacity == 0 {
            return FeedResult::Continue;
        }

        if byte == b'\n' {
            let cursor = self.state.cursor;
            if cursor > 0 && self.data()[cursor - 1] == b'\r' {
                self.state.cursor -= 1;
            }
            return FeedResult::Complete(self.complete_token(false));
        }

        let byte = self.state.config.shift.apply(byte);
        self.accumulate(byte, false)
    }

    /// Flush the pending partial token once input is exhausted.
    ///
    /// Returns its length, 0 when nothing is pending.
    pub fn finish(&mut self) -> usize {
        self.complete_token(true)
    }

    /// Feed a received chunk in delimiter mode, calling `on_token` for
    /// every completed token. Returns the number of tokens completed.
    pub fn feed_slice<F>(&mut self, chunk: &[u8], mut on_token: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let mut completed = 0;
        for &byte in chunk {
            if self.feed(byte).is_complete() {
                on_token(self.token());
                completed += 1;
            }
        }
        completed
    }

    /// Newline-mode counterpart of [`Tokenizer::feed_slice`]
    pub fn feed_lines<F>(&mut self, chunk: &[u8], mut on_line: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let mut completed = 0;
        for &byte in chunk {
            if self.feed_line(byte).is_complete() {
                on_line(self.token());
                completed += 1;
            }
        }
        completed
    }

    /// Preprocessing rules; `true` means the byte is consumed here
    fn discard(&mut self, byte: u8) -> bool {
        if byte == QUOTE {
            self.state.in_quotes = !self.state.in_quotes;
            return true;
        }

        if !self.state.in_quotes && self.state.config.is_ignored(byte) {
            return true;
        }

        self.state.cursor == 0 && byte == b' '
    }

    /// Store a byte, keeping one byte free for the terminator, and force a
    /// boundary when the data area fills up. Requires a nonzero capacity.
    fn accumulate(&mut self, byte: u8, clear_quotes: bool) -> FeedResult {
        let limit = self.state.capacity - 1;
        let cursor = self.state.cursor;

        if cursor < limit {
            let data = self.data_mut();
            data[cursor] = byte;
            data[cursor + 1] = 0;
            self.state.cursor += 1;
            self.state.len = self.state.cursor;
        }

        if self.state.cursor >= limit {
            trace!(
                "token buffer full at {} bytes, forcing flush",
                self.state.len
            );
            self.state.cursor = 0;
            if clear_quotes {
                self.state.in_quotes = false;
            }
            return FeedResult::Complete(self.state.len);
        }

        FeedResult::Continue
    }

    /// Close the token at the cursor and terminate it
    fn complete_token(&mut self, clear_quotes: bool) -> usize {
        let len = self.state.cursor;
        self.state.len = len;
        self.state.cursor = 0;
        if clear_quotes {
            self.state.in_quotes = false;
        }
        if let Some(end) = self.data_mut().get_mut(len) {
            *end = 0;
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShiftMode;
    use crate::tokenizer::overhead;

    fn tokenizer(usable: usize) -> Tokenizer<Box<[u8]>> {
        Tokenizer::acquire(usable).unwrap()
    }

    fn feed_all(t: &mut Tokenizer<Box<[u8]>>, input: &[u8]) -> Vec<String> {
        let mut tokens = Vec::new();
        t.feed_slice(input, |tok| {
            tokens.push(String::from_utf8_lossy(tok).into_owned())
        });
        tokens
    }

    #[test]
    fn test_simple_delimiter() {
        let mut t = tokenizer(64);
        t.set_delimiter(b' ');

        let mut result = FeedResult::Continue;
        for &b in b"reg_w " {
            result = t.feed(b);
        }
        assert_eq!(result, FeedResult::Complete(5));
        assert_eq!(t.token(), b"reg_w");

        for &b in b"0x01" {
            assert_eq!(t.feed(b), FeedResult::Continue);
        }
        assert_eq!(t.cursor(), 4);
        assert_eq!(t.finish(), 4);
        assert_eq!(t.token(), b"0x01");
    }

    #[test]
    fn test_default_delimiter_is_newline() {
        let mut t = tokenizer(64);
        assert_eq!(feed_all(&mut t, b"one\ntwo\n"), vec!["one", "two"]);
    }

    #[test]
    fn test_consecutive_delimiters_yield_empty_tokens() {
        let mut t = tokenizer(64);
        t.set_delimiter(b',');

        assert_eq!(feed_all(&mut t, b"a,,b,"), vec!["a", "", "b"]);
        assert_eq!(t.feed(b','), FeedResult::Complete(0));
        assert_eq!(t.data()[0], 0);
    }

    #[test]
    fn test_quotes_are_stripped() {
        let mut t = tokenizer(64);
        t.set_delimiter(b',');

        assert_eq!(t.feed(b'"'), FeedResult::Continue);
        assert!(t.in_quotes());
        for &b in b"my wifi" {
            t.feed(b);
        }
        assert_eq!(t.feed(b'"'), FeedResult::Continue);
        assert!(!t.in_quotes());

        assert_eq!(t.feed(b','), FeedResult::Complete(7));
        assert_eq!(t.token(), b"my wifi");
    }

    #[test]
    fn test_ignore_outside_quotes_only() {
        let mut t = tokenizer(64);
        t.set_delimiter(b',');
        t.set_ignore(b' ');

        assert_eq!(
            feed_all(&mut t, b"0x02= 0x15, \"a b\" c,"),
            vec!["0x02=0x15", "a bc"]
        );
    }

    #[test]
    fn test_ignored_delimiter_never_splits() {
        let mut t = tokenizer(64);
        t.set_delimiter(b',');
        t.set_ignore(b',');

        for &b in b"a,b,c" {
            assert_eq!(t.feed(b), FeedResult::Continue);
        }
        assert_eq!(t.finish(), 3);
        assert_eq!(t.token(), b"abc");
    }

    #[test]
    fn test_quoted_delimiter_still_splits() {
        let mut t = tokenizer(64);
        t.set_delimiter(b',');

        t.feed(b'"');
        t.feed(b'a');
        assert_eq!(t.feed(b','), FeedResult::Complete(1));
        assert!(!t.in_quotes());
    }

    #[test]
    fn test_leading_space_dropped() {
        let mut t = tokenizer(64);
        assert_eq!(feed_all(&mut t, b"   a b  \n"), vec!["a b  "]);
    }

    #[test]
    fn test_leading_space_dropped_even_inside_quotes() {
        let mut t = tokenizer(64);
        // the quote itself stores nothing, so the space is still leading
        assert_eq!(feed_all(&mut t, b"\" x\"\n"), vec!["x"]);
    }

    #[test]
    fn test_shift_modes() {
        let mut t = tokenizer(64);
        t.set_shift(ShiftMode::Upper);
        assert_eq!(feed_all(&mut t, b"Reboot\n"), vec!["REBOOT"]);

        t.set_shift(ShiftMode::Lower);
        assert_eq!(feed_all(&mut t, b"ReBoot\n"), vec!["reboot"]);
    }

    #[test]
    fn test_shift_does_not_affect_delimiter_match() {
        let mut t = tokenizer(64);
        t.set_delimiter(b'X');
        t.set_shift(ShiftMode::Upper);

        assert_eq!(feed_all(&mut t, b"axbX"), vec!["AXB"]);
    }

    #[test]
    fn test_forced_flush() {
        // 4 usable bytes hold 3 token bytes plus the terminator
        let mut t = tokenizer(4);

        assert_eq!(t.feed(b'a'), FeedResult::Continue);
        assert_eq!(t.feed(b'b'), FeedResult::Continue);
        assert_eq!(t.feed(b'c'), FeedResult::Complete(3));
        assert_eq!(t.token(), b"abc");
        assert_eq!(t.data()[3], 0);
        assert_eq!(t.cursor(), 0);

        assert_eq!(t.feed(b'd'), FeedResult::Continue);
        assert_eq!(t.finish(), 1);
        assert_eq!(t.token(), b"d");
    }

    #[test]
    fn test_forced_flush_clears_quotes() {
        let mut t = tokenizer(3);
        t.feed(b'"');
        t.feed(b'a');
        assert_eq!(t.feed(b'b'), FeedResult::Complete(2));
        assert!(!t.in_quotes());
    }

    #[test]
    fn test_single_byte_capacity_flushes_every_byte() {
        let mut storage = vec![0u8; overhead() + 1];
        let mut t = Tokenizer::new(&mut storage[..]).unwrap();

        assert_eq!(t.capacity(), 1);
        assert_eq!(t.feed(b'a'), FeedResult::Complete(0));
        assert_eq!(t.feed(b'b'), FeedResult::Complete(0));
        assert!(t.token().is_empty());
    }

    #[test]
    fn test_feed_line_crlf() {
        let mut t = tokenizer(64);

        let mut result = FeedResult::Continue;
        for &b in b"abc\r\n" {
            result = t.feed_line(b);
        }
        assert_eq!(result, FeedResult::Complete(3));
        assert_eq!(t.token(), b"abc");
        assert_eq!(t.data()[3], 0);

        for &b in b"abc\n" {
            result = t.feed_line(b);
        }
        assert_eq!(result, FeedResult::Complete(3));
        assert_eq!(t.token(), b"abc");
    }

    #[test]
    fn test_feed_line_ignores_configuration() {
        let mut t = tokenizer(64);
        t.set_delimiter(b' ');
        t.set_ignore(b'x');

        let mut lines = Vec::new();
        t.feed_lines(b"  \"ax b\"\n", |line| lines.push(line.to_vec()));
        assert_eq!(lines, vec![b"  \"ax b\"".to_vec()]);
    }

    #[test]
    fn test_feed_line_applies_shift() {
        let mut t = tokenizer(64);
        t.set_shift(ShiftMode::Lower);

        let mut lines = Vec::new();
        t.feed_lines(b"QQ:1007\r\n", |line| lines.push(line.to_vec()));
        assert_eq!(lines, vec![b"qq:1007".to_vec()]);
    }

    #[test]
    fn test_feed_line_empty_lines() {
        let mut t = tokenizer(64);
        let mut lines = Vec::new();
        let count = t.feed_lines(b"a\n\n\r\nb\n", |line| lines.push(line.to_vec()));

        assert_eq!(count, 4);
        assert_eq!(
            lines,
            vec![b"a".to_vec(), b"".to_vec(), b"".to_vec(), b"b".to_vec()]
        );
    }

    #[test]
    fn test_feed_line_overflow_keeps_quote_state() {
        let mut t = tokenizer(3);
        t.feed(b'"');
        assert!(t.in_quotes());

        t.feed_line(b'a');
        assert_eq!(t.feed_line(b'b'), FeedResult::Complete(2));
        assert!(t.in_quotes());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut t = tokenizer(64);
        assert_eq!(t.finish(), 0);

        for &b in b"tail" {
            t.feed(b);
        }
        assert_eq!(t.finish(), 4);
        assert_eq!(t.token(), b"tail");
        assert_eq!(t.finish(), 0);
    }

    #[test]
    fn test_finish_clears_quotes() {
        let mut t = tokenizer(64);
        t.feed(b'"');
        t.feed(b'a');
        assert_eq!(t.finish(), 1);
        assert!(!t.in_quotes());
    }

    #[test]
    fn test_reconfigure_mid_line() {
        let mut t = tokenizer(512);
        t.set_delimiter(b' ');
        t.set_ignore(None);

        let mut tokens = Vec::new();
        for &b in b"reg_w 0x01=0x20, 0x02= 0x15, 0x03=0x56" {
            if t.feed(b).is_complete() {
                tokens.push(t.token_str().unwrap().to_string());
                t.set_delimiter(b',');
                t.set_ignore(b' ');
            }
        }
        if t.finish() > 0 {
            tokens.push(t.token_str().unwrap().to_string());
        }

        assert_eq!(tokens, vec!["reg_w", "0x01=0x20", "0x02=0x15", "0x03=0x56"]);
    }

    #[test]
    fn test_feed_result_helpers() {
        assert_eq!(FeedResult::Continue.len(), 0);
        assert_eq!(FeedResult::Complete(7).len(), 7);
        assert_eq!(FeedResult::Complete(0).len(), 0);
        assert!(!FeedResult::Continue.is_complete());
        assert!(FeedResult::Complete(0).is_complete());
    }
}
