//! Expression parsing.
//!
//! Turns a `$namespace.field.method(args)` string into an evaluable
//! [`Expr`] tree. Parsing never evaluates and never consults a context, so
//! callers may cache trees per distinct source string and share them
//! read-only across renders.

use crate::error::ParseError;

/// Root namespaces an expression may start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// The page currently being rendered.
    Page,
    /// The innermost `:loop` iteration frame.
    Loop,
    /// Symbolic page/anchor link resolution.
    Link,
    /// Content-block rendering hints.
    Block,
    /// In-document section anchors.
    Section,
}

impl Namespace {
    /// Look up a namespace by its identifier.
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "page" => Some(Self::Page),
            "loop" => Some(Self::Loop),
            "link" => Some(Self::Link),
            "block" => Some(Self::Block),
            "section" => Some(Self::Section),
            _ => None,
        }
    }

    /// The identifier this namespace is written as.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Loop => "loop",
            Self::Link => "link",
            Self::Block => "block",
            Self::Section => "section",
        }
    }
}

/// A parsed expression: a namespace root plus an ordered chain of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The source text this tree was parsed from.
    pub source: String,
    /// Root namespace.
    pub root: Namespace,
    /// Path steps applied left to right.
    pub steps: Vec<Step>,
}

/// One step in an expression path.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Field access: `.title`.
    Field(String),
    /// Method call: `.format('January 02, 2006')`.
    Call { name: String, args: Vec<Arg> },
}

/// A call argument: a literal or a nested expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// String literal, single- or double-quoted.
    Str(String),
    /// Numeric literal.
    Number(f64),
    /// `true` / `false`.
    Bool(bool),
    /// Nested `$...` expression.
    Expr(Expr),
}

impl Expr {
    /// Parse a complete expression string.
    ///
    /// Fails with [`ParseError::TrailingInput`] if anything follows the
    /// expression.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (expr, consumed) = Self::parse_prefix(input)?;
        let rest = input[consumed..].trim();
        if !rest.is_empty() {
            return Err(ParseError::TrailingInput(rest.to_string()));
        }
        Ok(expr)
    }

    /// Parse a leading expression, returning it and the byte length consumed.
    ///
    /// Used for interpolation inside larger text, where the expression ends
    /// at the first character that cannot extend the path.
    pub fn parse_prefix(input: &str) -> Result<(Self, usize), ParseError> {
        let mut cursor = Cursor::new(input);
        let expr = cursor.parse_expr()?;
        Ok((expr, cursor.pos))
    }
}

/// Byte cursor over expression source.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Scan an `[A-Za-z_][A-Za-z0-9_]*` identifier.
    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.bump();
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.bump();
            }
        }
        &self.input[start..self.pos]
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;

        if !self.eat('$') {
            return Err(ParseError::MissingSigil);
        }

        let ident = self.ident();
        if ident.is_empty() {
            return Err(ParseError::EmptySegment);
        }
        let root = Namespace::from_ident(ident)
            .ok_or_else(|| ParseError::UnknownNamespace(ident.to_string()))?;

        let mut steps = Vec::new();
        loop {
            // A `.` extends the path only when an identifier follows;
            // otherwise it belongs to the surrounding text.
            let dot_pos = self.pos;
            if !self.eat('.') {
                break;
            }
            let name = self.ident();
            if name.is_empty() {
                self.pos = dot_pos;
                break;
            }

            if self.eat('(') {
                let args = self.parse_args(name)?;
                steps.push(Step::Call {
                    name: name.to_string(),
                    args,
                });
            } else {
                steps.push(Step::Field(name.to_string()));
            }
        }

        Ok(Expr {
            source: self.input[start..self.pos].to_string(),
            root,
            steps,
        })
    }

    /// Parse arguments up to and including the closing `)`.
    fn parse_args(&mut self, call_name: &str) -> Result<Vec<Arg>, ParseError> {
        let mut args = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnterminatedCall(call_name.to_string())),
                Some(')') => {
                    self.bump();
                    return Ok(args);
                }
                Some(',') if !args.is_empty() => {
                    self.bump();
                    self.skip_whitespace();
                    args.push(self.parse_arg(call_name)?);
                }
                _ => {
                    if !args.is_empty() {
                        let rest: String = self.input[self.pos..].chars().take(12).collect();
                        return Err(ParseError::InvalidArgument(rest));
                    }
                    args.push(self.parse_arg(call_name)?);
                }
            }
        }
    }

    fn parse_arg(&mut self, call_name: &str) -> Result<Arg, ParseError> {
        match self.peek() {
            None => Err(ParseError::UnterminatedCall(call_name.to_string())),
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                let start = self.pos;
                loop {
                    match self.bump() {
                        None => return Err(ParseError::UnterminatedString),
                        Some(c) if c == quote => break,
                        Some(_) => {}
                    }
                }
                let literal = &self.input[start..self.pos - quote.len_utf8()];
                Ok(Arg::Str(literal.to_string()))
            }
            Some('$') => {
                let expr = self.parse_expr()?;
                Ok(Arg::Expr(expr))
            }
            Some(c) if c.is_ascii_digit() || c == '-' => {
                let start = self.pos;
                self.bump();
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_digit() || c == '.')
                {
                    self.bump();
                }
                let text = &self.input[start..self.pos];
                text.parse::<f64>()
                    .map(Arg::Number)
                    .map_err(|_| ParseError::InvalidArgument(text.to_string()))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.ident();
                match word {
                    "true" => Ok(Arg::Bool(true)),
                    "false" => Ok(Arg::Bool(false)),
                    other => Err(ParseError::InvalidArgument(other.to_string())),
                }
            }
            Some(_) => {
                let rest: String = self.input[self.pos..].chars().take(12).collect();
                Err(ParseError::InvalidArgument(rest))
            }
        }
    }
}
