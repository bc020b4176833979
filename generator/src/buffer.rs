//! Indented text buffer for emitted source

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeBuffer {
    output: String,
    depth: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation. Empty lines carry no
    /// trailing whitespace.
    pub fn append_line(&mut self, line: &str) -> &mut Self {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.output.push_str(INDENT);
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
        self
    }

    /// Append `header {` and indent what follows
    pub fn enter_scope(&mut self, header: &str) -> &mut Self {
        self.append_line(&format!("{} {{", header));
        self.depth += 1;
        self
    }

    pub fn leave_scope(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.append_line("}")
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scopes_indent() {
        let mut buffer = CodeBuffer::new();
        buffer
            .append_line("// header")
            .append_line("")
            .enter_scope("fn main()")
            .enter_scope("if true")
            .append_line("run();")
            .leave_scope()
            .leave_scope();

        assert_eq!(buffer.depth(), 0);
        assert_eq!(
            buffer.finish(),
            "// header\n\nfn main() {\n    if true {\n        run();\n    }\n}\n"
        );
    }
}
