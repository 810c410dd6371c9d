use strum::EnumIter;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, EnumIter)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> char {
        match self {
            Self::Neg => '-',
            Self::Not => '¬',
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, EnumIter)]
pub enum DyadicOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,

    And,
    Or,
    Implies,
}

impl DyadicOp {
    pub fn is_arithmetic(self) -> bool {
        use DyadicOp::*;
        matches!(self, Add | Sub | Mul | Div | Pow)
    }

    pub fn symbol(self) -> char {
        use DyadicOp::*;
        match self {
            Add => '+',
            Sub => '-',
            Mul => '*',
            Div => '/',
            Pow => '^',
            And => '∧',
            Or => '∨',
            Implies => '⇒',
        }
    }

    pub fn precedence(self) -> u8 {
        use DyadicOp::*;
        match self {
            Implies => 0,
            Or => 1,
            And => 2,
            // relations sit at 4, set operators at 5
            Add | Sub => 6,
            Mul | Div => 7,
            Pow => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RelKind {
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl RelKind {
    pub fn symbol(self) -> char {
        use RelKind::*;
        match self {
            Eq => '=',
            Neq => '≠',
            Lt => '<',
            Gt => '>',
            Leq => '≤',
            Geq => '≥',
        }
    }

    pub const fn precedence() -> u8 {
        4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SetOpKind {
    Union,
    Intersection,
    SetMinus,
}

impl SetOpKind {
    pub fn symbol(self) -> char {
        use SetOpKind::*;
        match self {
            Union => '∪',
            Intersection => '∩',
            SetMinus => '\\',
        }
    }

    pub const fn precedence() -> u8 {
        5
    }
}
