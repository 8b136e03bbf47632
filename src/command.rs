//! Line-oriented block commands embedded in plain text.
//!
//! A text is split into blocks at directive lines. Each directive governs
//! the lines that follow it until the next directive, and rewrites them
//! according to the marker character each line starts with.
//!
//! # Syntax
//!
//! - A directive line is `apply` or `reject`, surrounded by optional
//!   whitespace. Directives are case-sensitive and are consumed.
//! - Data lines start with a marker: `+` (added), `-` (removed) or a
//!   single space (context). Any other line is unmarked.
//!
//! # Rewriting
//!
//! - `apply` drops removed lines and strips the marker from added and
//!   context lines.
//! - `reject` drops added lines and strips the marker from removed and
//!   context lines.
//! - Unmarked lines, and every line before the first directive, pass
//!   through verbatim.
//!
//! # Examples
//!
//! ```
//! use diffprompt::command::apply_commands;
//!
//! let input = "apply\n+line1\n-line2\n line3\nreject\n+line4\n-line5\n line6";
//! assert_eq!(apply_commands(input), "line1\nline3\nline5\nline6");
//! ```

/// A directive that opens a new command block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep added lines, drop removed lines
    Apply,
    /// Keep removed lines, drop added lines
    Reject,
}

impl Directive {
    /// Recognize a directive line, ignoring surrounding whitespace.
    ///
    /// ```
    /// use diffprompt::command::Directive;
    ///
    /// assert_eq!(Directive::parse("  apply\t"), Some(Directive::Apply));
    /// assert_eq!(Directive::parse("reject"), Some(Directive::Reject));
    /// assert_eq!(Directive::parse("Apply"), None);
    /// assert_eq!(Directive::parse("revert"), None);
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "apply" => Some(Directive::Apply),
            "reject" => Some(Directive::Reject),
            _ => None,
        }
    }
}

/// The marker carried by the first character of a data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Line starts with `+`
    Added,
    /// Line starts with `-`
    Removed,
    /// Line starts with a single space
    Context,
    /// Any other line, including the empty line
    Unmarked,
}

impl Marker {
    /// Classify a line by its first character.
    ///
    /// Returns the marker together with the content following it. Unmarked
    /// lines return the whole line as content. Only the first character is
    /// inspected, so `"+-x"` is an addition of `"-x"`.
    #[must_use]
    pub fn classify(line: &str) -> (Self, &str) {
        if let Some(content) = line.strip_prefix('+') {
            (Marker::Added, content)
        } else if let Some(content) = line.strip_prefix('-') {
            (Marker::Removed, content)
        } else if let Some(content) = line.strip_prefix(' ') {
            (Marker::Context, content)
        } else {
            (Marker::Unmarked, line)
        }
    }
}

/// A run of lines governed by one directive.
///
/// `directive` is `None` only for the lines preceding the first directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandBlock<'a> {
    pub directive: Option<Directive>,
    pub lines: &'a [&'a str],
}

impl<'a> CommandBlock<'a> {
    /// Rewrite the block's lines according to its directive.
    pub fn rewrite(self) -> impl Iterator<Item = &'a str> {
        let directive = self.directive;
        self.lines
            .iter()
            .filter_map(move |line| rewrite_line(directive, *line))
    }
}

fn rewrite_line(directive: Option<Directive>, line: &str) -> Option<&str> {
    let (marker, content) = Marker::classify(line);

    match (directive, marker) {
        (None, _) | (_, Marker::Unmarked) => Some(line),
        (Some(Directive::Apply), Marker::Removed) | (Some(Directive::Reject), Marker::Added) => {
            None
        }
        (Some(_), _) => Some(content),
    }
}

/// Iterator over the command blocks of a sequence of lines.
///
/// Each step consumes a leading directive (if any) and every line up to,
/// but not including, the next directive.
#[derive(Debug, Clone)]
pub struct CommandBlocks<'a> {
    remaining: &'a [&'a str],
}

impl<'a> CommandBlocks<'a> {
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { remaining: lines }
    }
}

impl<'a> Iterator for CommandBlocks<'a> {
    type Item = CommandBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = self.remaining.split_first()?;

        let (directive, body) = match Directive::parse(first) {
            Some(directive) => (Some(directive), rest),
            None => (None, self.remaining),
        };

        let end = body
            .iter()
            .position(|line| Directive::parse(line).is_some())
            .unwrap_or(body.len());
        let (lines, remaining) = body.split_at(end);
        self.remaining = remaining;

        Some(CommandBlock { directive, lines })
    }
}

/// Apply every block command in `input` and return the rewritten text.
///
/// Lines are split on `\n` and rejoined with `\n`. When the result holds a
/// single line, an empty line is appended so the output always contains at
/// least one newline. Text without directives is returned unchanged.
///
/// ```
/// use diffprompt::command::apply_commands;
///
/// assert_eq!(apply_commands("reject\n+a\n-b\n c\n"), "b\nc\n");
/// assert_eq!(apply_commands(""), "\n");
/// ```
#[must_use]
pub fn apply_commands(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();

    let mut output: Vec<&str> = CommandBlocks::new(&lines)
        .flat_map(CommandBlock::rewrite)
        .collect();

    if output.len() == 1 {
        output.push("");
    }

    output.join("\n")
}
