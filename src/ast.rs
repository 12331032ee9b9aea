use std::{fmt, rc::Rc};

/// A position in the source text, 1-based.
///
/// Every AST node records the location of the token that introduced it so
/// that the evaluator can point runtime errors at the offending construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Byte column within the line, starting at 1.
    pub column: usize,
}

impl Location {
    /// Creates a location from a line and column pair.
    ///
    /// ## Example
    /// ```
    /// use volt::ast::Location;
    ///
    /// let loc = Location::new(3, 7);
    /// assert_eq!(loc.to_string(), "line 3, column 7");
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A constant written directly in source code.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A double precision number such as `42` or `3.5`.
    Number(f64),
    /// A string with escape sequences already resolved.
    String(String),
    /// `true` or `false`.
    Bool(bool),
    /// `nil`.
    Nil,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Prefix operators producing a new value from a single operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`).
    Not,
}

/// Operators that always evaluate both operands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Floating point remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Short-circuiting operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// `++` and `--`, used both as prefix and postfix operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// A function body together with its signature.
///
/// Declarations are shared through `Rc` because a closure value created at
/// runtime keeps the body alive after the program that defined it is gone
/// (a REPL line, for example).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The declared name, or `None` for a `fn (..) { .. }` expression.
    pub name:   Option<String>,
    /// Parameter names in positional order.
    pub params: Vec<String>,
    /// Statements executed on each call.
    pub body:   Vec<Stmt>,
    /// Location of the `fn` keyword.
    pub loc:    Location,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Source location.
        loc:   Location,
    },
    /// A reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Source location.
        loc:  Location,
    },
    /// `-x` or `!x`.
    Unary {
        /// The operator.
        op:   UnaryOperator,
        /// The operand.
        expr: Box<Self>,
        /// Source location of the operator.
        loc:  Location,
    },
    /// Arithmetic, comparison and equality.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Source location of the operator.
        loc:   Location,
    },
    /// `&&` and `||`. The right operand is evaluated only when needed.
    Logical {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    LogicalOperator,
        /// Right operand.
        right: Box<Self>,
        /// Source location of the operator.
        loc:   Location,
    },
    /// A parenthesized expression.
    Grouping {
        /// The inner expression.
        expr: Box<Self>,
        /// Location of the opening parenthesis.
        loc:  Location,
    },
    /// A call such as `f(1, 2)` or `list.push(3)`.
    Call {
        /// The expression producing the callable.
        callee:    Box<Self>,
        /// Arguments, evaluated left to right.
        arguments: Vec<Self>,
        /// Location of the opening parenthesis.
        loc:       Location,
    },
    /// `name = value`.
    Assign {
        /// Target variable.
        name:  String,
        /// Assigned value.
        value: Box<Self>,
        /// Location of the target.
        loc:   Location,
    },
    /// `name += value` and friends.
    CompoundAssign {
        /// Target variable.
        name:  String,
        /// One of `Add`, `Sub`, `Mul`, `Div`.
        op:    BinaryOperator,
        /// Right-hand side.
        value: Box<Self>,
        /// Location of the operator.
        loc:   Location,
    },
    /// `++x`, `x++`, `--x`, `x--`.
    Update {
        /// Target variable.
        name:   String,
        /// Increment or decrement.
        op:     UpdateOperator,
        /// `true` for the prefix form, which yields the updated value.
        prefix: bool,
        /// Location of the operator.
        loc:    Location,
    },
    /// `condition ? then_branch : else_branch`.
    Ternary {
        /// The tested expression.
        condition:   Box<Self>,
        /// Evaluated when the condition is truthy.
        then_branch: Box<Self>,
        /// Evaluated otherwise.
        else_branch: Box<Self>,
        /// Location of the `?`.
        loc:         Location,
    },
    /// `[a, b, c]`.
    ArrayLiteral {
        /// Element expressions.
        elements: Vec<Self>,
        /// Location of the `[`.
        loc:      Location,
    },
    /// `object[index]`.
    Index {
        /// The indexed array or hash map.
        object: Box<Self>,
        /// The index or key.
        index:  Box<Self>,
        /// Location of the `[`.
        loc:    Location,
    },
    /// `object[index] = value`.
    IndexAssign {
        /// The indexed array or hash map.
        object: Box<Self>,
        /// The index or key.
        index:  Box<Self>,
        /// Assigned value.
        value:  Box<Self>,
        /// Location of the `[`.
        loc:    Location,
    },
    /// `object.name`.
    Member {
        /// The receiver.
        object: Box<Self>,
        /// Member name.
        name:   String,
        /// Location of the member name.
        loc:    Location,
    },
    /// `{ key: value, ... }`.
    HashMapLiteral {
        /// Key and value expressions in source order.
        entries: Vec<(Self, Self)>,
        /// Location of the `{`.
        loc:     Location,
    },
    /// `fn (a, b) { ... }`.
    Function(Rc<FunctionDecl>),
}

impl Expr {
    /// Gets the source location of `self`.
    /// ## Example
    /// ```
    /// use volt::ast::{Expr, Location};
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             loc:  Location::new(5, 2), };
    ///
    /// assert_eq!(expr.location().line, 5);
    /// ```
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Literal { loc, .. }
            | Self::Variable { loc, .. }
            | Self::Unary { loc, .. }
            | Self::Binary { loc, .. }
            | Self::Logical { loc, .. }
            | Self::Grouping { loc, .. }
            | Self::Call { loc, .. }
            | Self::Assign { loc, .. }
            | Self::CompoundAssign { loc, .. }
            | Self::Update { loc, .. }
            | Self::Ternary { loc, .. }
            | Self::ArrayLiteral { loc, .. }
            | Self::Index { loc, .. }
            | Self::IndexAssign { loc, .. }
            | Self::Member { loc, .. }
            | Self::HashMapLiteral { loc, .. } => *loc,
            Self::Function(decl) => decl.loc,
        }
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression evaluated for its side effects.
    Expression {
        /// The expression.
        expr: Expr,
        /// Source location.
        loc:  Location,
    },
    /// `print expr;`
    Print {
        /// The printed expression.
        expr: Expr,
        /// Location of the keyword.
        loc:  Location,
    },
    /// `let name = initializer;`
    Let {
        /// The declared name.
        name:        String,
        /// Optional initial value; the variable is `nil` without one.
        initializer: Option<Expr>,
        /// Location of the name.
        loc:         Location,
    },
    /// `{ ... }`, executed in a fresh child scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Location of the `{`.
        loc:        Location,
    },
    /// `if (condition) then_branch else else_branch`
    If {
        /// The tested expression.
        condition:   Expr,
        /// Executed when the condition is truthy.
        then_branch: Box<Self>,
        /// Executed otherwise, when present.
        else_branch: Option<Box<Self>>,
        /// Location of the keyword.
        loc:         Location,
    },
    /// `while (condition) body`
    While {
        /// Tested before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Location of the keyword.
        loc:       Location,
    },
    /// `run body until (condition);`
    ///
    /// The body runs at least once and repeats until the condition becomes
    /// truthy.
    RunUntil {
        /// The loop body.
        body:      Box<Self>,
        /// Tested after every iteration.
        condition: Expr,
        /// Location of the `run` keyword.
        loc:       Location,
    },
    /// `for (initializer; condition; increment) body`
    For {
        /// A `let` or expression statement run once in the loop scope.
        initializer: Option<Box<Self>>,
        /// Tested before every iteration; absent means `true`.
        condition:   Option<Expr>,
        /// Evaluated after every iteration, including after `continue`.
        increment:   Option<Expr>,
        /// The loop body.
        body:        Box<Self>,
        /// Location of the keyword.
        loc:         Location,
    },
    /// `fn name(params) { body }`
    Function(Rc<FunctionDecl>),
    /// `return value;`
    Return {
        /// The returned expression; `nil` when absent.
        value: Option<Expr>,
        /// Location of the keyword.
        loc:   Location,
    },
    /// `break;`
    Break {
        /// Location of the keyword.
        loc: Location,
    },
    /// `continue;`
    Continue {
        /// Location of the keyword.
        loc: Location,
    },
}

impl Stmt {
    /// Gets the source location of `self`.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Expression { loc, .. }
            | Self::Print { loc, .. }
            | Self::Let { loc, .. }
            | Self::Block { loc, .. }
            | Self::If { loc, .. }
            | Self::While { loc, .. }
            | Self::RunUntil { loc, .. }
            | Self::For { loc, .. }
            | Self::Return { loc, .. }
            | Self::Break { loc }
            | Self::Continue { loc } => *loc,
            Self::Function(decl) => decl.loc,
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}

impl fmt::Display for UpdateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => write!(f, "++"),
            Self::Decrement => write!(f, "--"),
        }
    }
}

/// Writes a string literal back in source form, re-escaping what the lexer
/// decoded.
fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            '\\' => write!(f, "\\\\")?,
            '"' => write!(f, "\\\"")?,
            '\0' => write!(f, "\\0")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write_string_literal(f, s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
        }
    }
}

/// Renders expressions as source code that parses back to the same tree.
///
/// Binary operators are printed without extra parentheses: the parser keeps
/// explicit `Grouping` nodes, so the tree it produced already agrees with
/// operator precedence.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => write!(f, "{name}"),
            Self::Unary { op, expr, .. } => {
                let operand = expr.to_string();
                // `- -x` must not collapse into the `--` token.
                if *op == UnaryOperator::Negate && operand.starts_with('-') {
                    write!(f, "{op} {operand}")
                } else {
                    write!(f, "{op}{operand}")
                }
            },
            Self::Binary { left, op, right, .. } => write!(f, "{left} {op} {right}"),
            Self::Logical { left, op, right, .. } => write!(f, "{left} {op} {right}"),
            Self::Grouping { expr, .. } => write!(f, "({expr})"),
            Self::Call { callee, arguments, .. } => {
                write!(f, "{callee}(")?;
                write_separated(f, arguments)?;
                write!(f, ")")
            },
            Self::Assign { name, value, .. } => write!(f, "{name} = {value}"),
            Self::CompoundAssign { name, op, value, .. } => write!(f, "{name} {op}= {value}"),
            Self::Update { name, op, prefix, .. } => {
                if *prefix {
                    write!(f, "{op}{name}")
                } else {
                    write!(f, "{name}{op}")
                }
            },
            Self::Ternary { condition,
                            then_branch,
                            else_branch,
                            .. } => write!(f, "{condition} ? {then_branch} : {else_branch}"),
            Self::ArrayLiteral { elements, .. } => {
                write!(f, "[")?;
                write_separated(f, elements)?;
                write!(f, "]")
            },
            Self::Index { object, index, .. } => write!(f, "{object}[{index}]"),
            Self::IndexAssign { object,
                                index,
                                value,
                                .. } => write!(f, "{object}[{index}] = {value}"),
            Self::Member { object, name, .. } => write!(f, "{object}.{name}"),
            Self::HashMapLiteral { entries, .. } => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            },
            Self::Function(decl) => write_function(f, decl, 0),
        }
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 4)
}

fn write_function(f: &mut fmt::Formatter<'_>, decl: &FunctionDecl, depth: usize) -> fmt::Result {
    match &decl.name {
        Some(name) => write!(f, "fn {name}(")?,
        None => write!(f, "fn (")?,
    }
    write_separated(f, &decl.params)?;
    writeln!(f, ") {{")?;
    for stmt in &decl.body {
        write_stmt(f, stmt, depth + 1)?;
        writeln!(f)?;
    }
    indent(f, depth)?;
    write!(f, "}}")
}

/// Writes a statement that is the body of `if`, `while`, `for` or `run`.
///
/// Blocks continue on the header line; anything else is written inline.
fn write_body(f: &mut fmt::Formatter<'_>, body: &Stmt, depth: usize) -> fmt::Result {
    write!(f, " ")?;
    match body {
        Stmt::Block { statements, .. } => write_block(f, statements, depth),
        other => write_stmt_inline(f, other, depth),
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, statements: &[Stmt], depth: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for stmt in statements {
        write_stmt(f, stmt, depth + 1)?;
        writeln!(f)?;
    }
    indent(f, depth)?;
    write!(f, "}}")
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    write_stmt_inline(f, stmt, depth)
}

fn write_stmt_inline(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    match stmt {
        Stmt::Expression { expr, .. } => write!(f, "{expr};"),
        Stmt::Print { expr, .. } => write!(f, "print {expr};"),
        Stmt::Let { name,
                    initializer: Some(init),
                    .. } => write!(f, "let {name} = {init};"),
        Stmt::Let { name,
                    initializer: None,
                    .. } => write!(f, "let {name};"),
        Stmt::Block { statements, .. } => write_block(f, statements, depth),
        Stmt::If { condition,
                   then_branch,
                   else_branch,
                   .. } => {
            write!(f, "if ({condition})")?;
            write_body(f, then_branch, depth)?;
            if let Some(else_branch) = else_branch {
                write!(f, " else")?;
                write_body(f, else_branch, depth)?;
            }
            Ok(())
        },
        Stmt::While { condition, body, .. } => {
            write!(f, "while ({condition})")?;
            write_body(f, body, depth)
        },
        Stmt::RunUntil { body, condition, .. } => {
            write!(f, "run")?;
            write_body(f, body, depth)?;
            write!(f, " until ({condition});")
        },
        Stmt::For { initializer,
                    condition,
                    increment,
                    body,
                    .. } => {
            write!(f, "for (")?;
            match initializer {
                Some(init) => write_stmt_inline(f, init, depth)?,
                None => write!(f, ";")?,
            }
            if let Some(condition) = condition {
                write!(f, " {condition}")?;
            }
            write!(f, ";")?;
            if let Some(increment) = increment {
                write!(f, " {increment}")?;
            }
            write!(f, ")")?;
            write_body(f, body, depth)
        },
        Stmt::Function(decl) => write_function(f, decl, depth),
        Stmt::Return { value: Some(value), .. } => write!(f, "return {value};"),
        Stmt::Return { value: None, .. } => write!(f, "return;"),
        Stmt::Break { .. } => write!(f, "break;"),
        Stmt::Continue { .. } => write!(f, "continue;"),
    }
}

/// Renders a statement as source code, indented with four spaces per level.
impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

/// Renders a whole program, one top-level statement per line.
///
/// This is the inverse of parsing up to formatting: feeding the output back
/// through the lexer and parser yields an equivalent tree.
///
/// ## Example
/// ```
/// use volt::{ast::print_program, interpreter::{lexer::tokenize, parser::parse_program}};
///
/// let tokens = tokenize("let x=1+2*3;print x;");
/// let (program, errors) = parse_program(&tokens);
/// assert!(errors.is_empty());
/// assert_eq!(print_program(&program), "let x = 1 + 2 * 3;\nprint x;\n");
/// ```
#[must_use]
pub fn print_program(statements: &[Stmt]) -> String {
    statements.iter().map(|stmt| format!("{stmt}\n")).collect()
}
