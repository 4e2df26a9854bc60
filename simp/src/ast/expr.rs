//! Expression AST nodes
//!
//! Statements are expressions too: every node evaluates to a value, so a
//! program and a block are plain sequences of `Spanned<Expr>`.

use super::{Selector, Spanned, TypeTag};
use serde::{Deserialize, Serialize};

/// A `{ ... }` statement sequence
pub type Block = Vec<Spanned<Expr>>;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Integer(i64),
    /// Text literal
    Text(String),
    /// Character literal
    Character(char),

    /// Variable read
    Var(String),

    /// Assignment, optionally with a declared type: `num x = 1`, `a[0] = 2`
    VarAssign {
        ty: Option<TypeTag>,
        target: Target,
        value: Box<Spanned<Expr>>,
    },

    /// Counter access: `x.c1`, `a[2].c2`
    VarFunc {
        target: Box<Spanned<Expr>>,
        selector: Selector,
    },

    /// Index read: `a[i]`
    VarIndex {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },

    /// Array literal: `[1, 2, 3]`
    Array(Vec<Spanned<Expr>>),

    /// Binary operation
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Unary negation
    Neg(Box<Spanned<Expr>>),

    /// `x += e`, `x -= e`, `x *= e`, `x /= e`
    CompoundAssign {
        target: Target,
        op: CompoundOp,
        value: Box<Spanned<Expr>>,
    },

    /// `x++`
    Increment(Target),
    /// `x--`
    Decrement(Target),

    /// `if cond { ... } else { ... }`
    If {
        cond: Box<Spanned<Expr>>,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// `for (init; cond; step) { ... }`
    For {
        init: Box<Spanned<Expr>>,
        cond: Box<Spanned<Expr>>,
        step: Box<Spanned<Expr>>,
        body: Block,
    },

    /// `while cond { ... }`
    While {
        cond: Box<Spanned<Expr>>,
        body: Block,
    },

    /// Function declaration; `ret` is `None` for `void`
    FuncDeclare {
        name: String,
        ret: Option<TypeTag>,
        params: Vec<String>,
        body: Block,
    },

    /// Function call
    FuncCall {
        name: String,
        args: Vec<Spanned<Expr>>,
    },

    /// `return e`
    Return(Box<Spanned<Expr>>),

    /// `print(e)`
    Print(Box<Spanned<Expr>>),

    /// `print(x.c1)`
    PrintCounter {
        target: Box<Spanned<Expr>>,
        selector: Selector,
    },

    /// `fileprint("out.txt", e)`
    FilePrint {
        file: Box<Spanned<Expr>>,
        payload: Box<Spanned<Expr>>,
    },

    /// `fileprint("out.txt", x.c2)`
    FilePrintCounter {
        file: Box<Spanned<Expr>>,
        target: Box<Spanned<Expr>>,
        selector: Selector,
    },
}

impl Expr {
    /// Kind tag of the node, as named in the parser/evaluator contract
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Integer(_) => "Integer",
            Expr::Text(_) => "Text",
            Expr::Character(_) => "Character",
            Expr::Var(_) => "Var",
            Expr::VarAssign { .. } => "VarAssign",
            Expr::VarFunc { .. } => "VarFunc",
            Expr::VarIndex { .. } => "VarIndex",
            Expr::Array(_) => "Array",
            Expr::Binary { op, .. } => op.kind(),
            Expr::Neg(_) => "Neg",
            Expr::CompoundAssign { op, .. } => op.kind(),
            Expr::Increment(_) => "Increment",
            Expr::Decrement(_) => "Decrement",
            Expr::If { .. } => "If",
            Expr::For { .. } => "For",
            Expr::While { .. } => "While",
            Expr::FuncDeclare { .. } => "FuncDeclare",
            Expr::FuncCall { .. } => "FuncCall",
            Expr::Return(_) => "Return",
            Expr::Print(_) => "Print",
            Expr::PrintCounter { .. } => "PrintCounter",
            Expr::FilePrint { .. } => "FilePrint",
            Expr::FilePrintCounter { .. } => "FilePrintCounter",
        }
    }

    /// Whether the node is a pure value-producing expression whose result
    /// is worth echoing in the REPL
    pub fn yields_value(&self) -> bool {
        matches!(
            self,
            Expr::Integer(_)
                | Expr::Text(_)
                | Expr::Character(_)
                | Expr::Var(_)
                | Expr::VarFunc { .. }
                | Expr::VarIndex { .. }
                | Expr::Array(_)
                | Expr::Binary { .. }
                | Expr::Neg(_)
                | Expr::FuncCall { .. }
        )
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Plain variable
    Name(String),
    /// Element of an array variable
    Index {
        name: String,
        index: Box<Spanned<Expr>>,
    },
}

impl Target {
    /// Name of the variable the target lives in
    pub fn name(&self) -> &str {
        match self {
            Target::Name(name) => name,
            Target::Index { name, .. } => name,
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinOp {
    pub fn kind(self) -> &'static str {
        match self {
            BinOp::Add => "Add",
            BinOp::Sub => "Sub",
            BinOp::Mul => "Mul",
            BinOp::Div => "Div",
            BinOp::Eq => "Eq",
            BinOp::Ne => "Ne",
            BinOp::Lt => "Lt",
            BinOp::Le => "Le",
            BinOp::Gt => "Gt",
            BinOp::Ge => "Ge",
            BinOp::And => "And",
            BinOp::Or => "Or",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Le => write!(f, "<="),
            BinOp::Gt => write!(f, ">"),
            BinOp::Ge => write!(f, ">="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}

/// Compound assignment operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundOp {
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl CompoundOp {
    pub fn kind(self) -> &'static str {
        match self {
            CompoundOp::AddAssign => "AddAssign",
            CompoundOp::SubAssign => "SubAssign",
            CompoundOp::MulAssign => "MulAssign",
            CompoundOp::DivAssign => "DivAssign",
        }
    }

    /// Arithmetic operator applied before the write-back
    pub fn binop(self) -> BinOp {
        match self {
            CompoundOp::AddAssign => BinOp::Add,
            CompoundOp::SubAssign => BinOp::Sub,
            CompoundOp::MulAssign => BinOp::Mul,
            CompoundOp::DivAssign => BinOp::Div,
        }
    }
}

impl std::fmt::Display for CompoundOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=", self.binop())
    }
}
