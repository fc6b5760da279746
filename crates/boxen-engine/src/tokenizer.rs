use crate::CommandError;

pub const COMMENT_MARKER: char = '!';
pub const NEGATION_MARKER: &str = "no";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub verb: String,
    pub args: Vec<String>,
}

/// Splits a raw input line into a normalized verb and its arguments.
///
/// Comment lines and blank lines yield `None`. A leading `no` is folded into
/// the following token (`no shutdown` becomes `no_shutdown`) and hyphens in
/// the verb become underscores.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let trimmed = line.trim_start();
    if trimmed.starts_with(COMMENT_MARKER) {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let first = tokens.next()?;
    let mut args = tokens.map(str::to_string).collect::<Vec<_>>();

    let verb = if first == NEGATION_MARKER && !args.is_empty() {
        let negated = args.remove(0);
        format!("{first}_{negated}")
    } else {
        first.to_string()
    };

    Some(ParsedLine {
        verb: verb.replace('-', "_"),
        args,
    })
}

/// One expected position in a fixed keyword sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Literal keyword; any non-empty prefix of it is accepted.
    Keyword(&'static str),
    /// Captures the supplied argument as is.
    Any,
}

/// Matches `args` positionally against `expected` and returns the captured values.
///
/// Arguments past the last expected item are ignored.
pub fn dissect(command: &str, args: &[String], expected: &[Expect]) -> Result<Vec<String>, CommandError> {
    let offending = || {
        std::iter::once(command)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut captured = Vec::new();
    for (index, item) in expected.iter().enumerate() {
        let Some(supplied) = args.get(index) else {
            return Err(CommandError::syntax(offending()));
        };
        match item {
            Expect::Keyword(keyword) => {
                if !keyword.starts_with(supplied.as_str()) {
                    return Err(CommandError::syntax(offending()));
                }
            }
            Expect::Any => captured.push(supplied.clone()),
        }
    }
    Ok(captured)
}
