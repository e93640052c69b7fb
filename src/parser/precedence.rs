//! Precedence levels for Pratt expression parsing, per spec §4.2.

use crate::token::TokenKind;

/// §4.2 names `LOWEST < EQUALS < LESSGREATER < SUM < PRODUCT < POWER
/// < PREFIX < CALL < INDEX < DOT` explicitly; it is silent on `&&`/`||`, so
/// those are placed below `EQUALS` (the conventional slot for logical
/// connectives) without disturbing that named chain.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub enum Precedence {
    Lowest,
    LogicOr,     // ||
    LogicAnd,    // &&
    Equals,      // == !=
    LessGreater, // < > <= >=
    Sum,         // + -
    Product,     // * / %
    Power,       // **
    Prefix,      // unary - !
    Call,        // (
    Index,       // [
    Dot,         // .
}

impl Precedence {
    /// The precedence at which `kind` binds as an infix/postfix operator.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Or => Precedence::LogicOr,
            TokenKind::And => Precedence::LogicAnd,
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
            TokenKind::Pow => Precedence::Power,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            TokenKind::Dot => Precedence::Dot,
            _ => Precedence::Lowest,
        }
    }
}
