//! Minimal writer for nginx configuration text.
//!
//! Output is a pure function of the calls made: four-space indentation, one
//! directive per line, `\n` line endings.

const INDENT: &str = "    ";
const BREAKERS: &[char] = &[';', '{', '}', '#', '"', '\'', '\\', '$'];

/// True when `s` can be emitted as a single unquoted directive argument.
pub fn is_bare_word(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || BREAKERS.contains(&c))
}

/// True when `s` can be emitted as the (space separated) arguments of one directive.
pub fn is_directive_args(s: &str) -> bool {
    !s.trim().is_empty()
        && !s
            .chars()
            .any(|c| c == '\n' || c == '\r' || c.is_control() || BREAKERS.contains(&c))
}

#[derive(Debug, Default)]
pub struct ConfWriter {
    out: String,
    depth: usize,
}

impl ConfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: &str) {
        self.indent();
        self.out.push_str("# ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn directive<I, S>(&mut self, name: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.indent();
        self.out.push_str(name);
        for arg in args {
            self.out.push(' ');
            self.out.push_str(arg.as_ref());
        }
        self.out.push_str(";\n");
    }

    pub fn block<I, S, F>(&mut self, name: &str, args: I, body: F)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(&mut Self),
    {
        self.indent();
        self.out.push_str(name);
        for arg in args {
            self.out.push(' ');
            self.out.push_str(arg.as_ref());
        }
        self.out.push_str(" {\n");

        self.depth += 1;
        body(self);
        self.depth -= 1;

        self.indent();
        self.out.push_str("}\n");
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}
