//! Turns a cleaned String expression into a symbolic expression.
//!
//! # Example
//! ```
//! use RustedMathSolver::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("5*x**2+sin(x)").unwrap();
//! assert_eq!(parsed_expression.to_string(), "5*x**2 + sin(x)");
//! ```
//                  grammar (lowest to highest precedence)
//                |  sum     := product (('+'|'-') product)*    |
//                |  product := unary (('*'|'/') unary)*        |
//                |  unary   := ('+'|'-') unary | power         |
//                |  power   := atom (('**'|'^') unary)?        |
//                |  atom    := number | name | name '(' sum ')'|
//                |             | '(' sum ')'                   |
//  '**' is right associative and binds tighter than unary minus: -x**2 = -(x**2)
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;

/// Nesting limit for parentheses and unary operators.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Name(name) => name.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Power => "**".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, SymbolicError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => tokens.push((Token::Plus, start)),
            '-' => tokens.push((Token::Minus, start)),
            '/' => tokens.push((Token::Slash, start)),
            '^' => tokens.push((Token::Power, start)),
            '(' => tokens.push((Token::LParen, start)),
            ')' => tokens.push((Token::RParen, start)),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push((Token::Power, start));
                    i += 1;
                } else {
                    tokens.push((Token::Star, start));
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| SymbolicError::InvalidNumber(literal.clone()))?;
                tokens.push((Token::Number(value), start));
                // a number glued to a name (2x) is not implicit multiplication
                if i < chars.len() && (chars[i].is_alphabetic() || chars[i] == '_') {
                    return Err(SymbolicError::UnexpectedChar { ch: chars[i], pos: i });
                }
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((Token::Name(name), start));
                continue;
            }
            other => return Err(SymbolicError::UnexpectedChar { ch: other, pos: i }),
        }
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self) -> SymbolicError {
        match self.tokens.get(self.pos) {
            Some((token, at)) => SymbolicError::UnexpectedToken {
                token: token.describe(),
                pos: *at,
            },
            None => SymbolicError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, wanted: Token) -> Result<(), SymbolicError> {
        if self.peek() == Some(&wanted) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn descend(&mut self) -> Result<(), SymbolicError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SymbolicError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn parse_sum(&mut self) -> Result<Expr, SymbolicError> {
        self.descend()?;
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = Expr::Add(Box::new(lhs), Box::new(rhs));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        self.depth -= 1;
        Ok(lhs)
    }

    fn parse_product(&mut self) -> Result<Expr, SymbolicError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = Expr::Mul(Box::new(lhs), Box::new(rhs));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = Expr::Div(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, SymbolicError> {
        self.descend()?;
        let result = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                match self.parse_unary()? {
                    Expr::Const(value) => Expr::Const(-value),
                    inner => -inner,
                }
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };
        self.depth -= 1;
        Ok(result)
    }

    fn parse_power(&mut self) -> Result<Expr, SymbolicError> {
        let base = self.parse_atom()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, SymbolicError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Const(value)),
            Some(Token::LParen) => {
                let inner = self.parse_sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let arg = self.parse_sum()?;
                    self.expect(Token::RParen)?;
                    apply_function(&name, arg)
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
            None => Err(SymbolicError::UnexpectedEnd),
        }
    }
}

/// Maps a function name (CAS spelling plus the usual aliases) to its node.
fn apply_function(name: &str, arg: Expr) -> Result<Expr, SymbolicError> {
    let arg = Box::new(arg);
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "log" | "ln" => Expr::Ln(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        _ => return Err(SymbolicError::UnknownFunction(name.to_string())),
    };
    Ok(expr)
}

/// Parses a cleaned expression string. The whole input must be consumed.
pub fn parse_expression_func(input: &str) -> Result<Expr, SymbolicError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SymbolicError::EmptyExpression);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_sum()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

impl Expr {
    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, var_name; `pi`, `E`, `I` are named constants
    /// - Constants: 3, 3.14
    /// - Operators: +, -, *, /, ** and ^ for powers
    /// - Functions: exp, log/ln, sqrt, sin, cos, tan, cot, asin, acos, atan, acot
    /// - Parentheses for grouping
    pub fn parse_expression(input: &str) -> Result<Expr, SymbolicError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_parse_exponential() {
        let expr = parse_expression_func("exp(x)").unwrap();
        assert_eq!(expr, Expr::Exp(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_subtraction_is_left_associative() {
        let expr = parse_expression_func("x-2-y").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Sub(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Const(2.0))
                )),
                Box::new(Expr::Var("y".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_double_star_power() {
        let expr = parse_expression_func("x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
        assert_eq!(expr, parse_expression_func("x^2").unwrap());
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse_expression_func("2**3**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Const(3.0)),
                    Box::new(Expr::Const(2.0))
                ))
            )
        );
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let expr = parse_expression_func("-x**2").unwrap();
        assert_eq!(
            expr,
            -Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_negative_exponent() {
        let expr = parse_expression_func("x**-1").unwrap();
        assert_eq!(expr, Expr::var("x").pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_parse_sqrt_is_half_power() {
        let expr = parse_expression_func("sqrt(16)").unwrap();
        assert_eq!(expr, Expr::Const(16.0).pow(Expr::Const(0.5)));
    }

    #[test]
    fn test_parse_logarithm_aliases() {
        let log = parse_expression_func("log(x)").unwrap();
        let ln = parse_expression_func("ln(x)").unwrap();
        assert_eq!(log, Expr::Ln(Box::new(Expr::Var("x".to_string()))));
        assert_eq!(log, ln);
    }

    #[test]
    fn test_parse_expression_with_brackets() {
        let expr = parse_expression_func("(x + y) * z").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Var("z".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
    }

    #[test]
    fn test_invalid_expression() {
        assert_eq!(
            parse_expression_func("(x +"),
            Err(SymbolicError::UnexpectedEnd)
        );
        assert!(parse_expression_func("(x + y").is_err());
        assert!(parse_expression_func("x y").is_err());
        assert!(parse_expression_func("").is_err());
    }

    #[test]
    fn test_number_glued_to_name_is_rejected() {
        assert!(matches!(
            parse_expression_func("x**2dx"),
            Err(SymbolicError::UnexpectedChar { ch: 'd', .. })
        ));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            parse_expression_func("foo(x)"),
            Err(SymbolicError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(MAX_DEPTH + 5), ")".repeat(MAX_DEPTH + 5));
        assert_eq!(
            parse_expression_func(&deep),
            Err(SymbolicError::TooDeep(MAX_DEPTH))
        );
    }

    #[test]
    fn test_bad_number() {
        assert_eq!(
            parse_expression_func("1.2.3"),
            Err(SymbolicError::InvalidNumber("1.2.3".to_string()))
        );
    }
}
