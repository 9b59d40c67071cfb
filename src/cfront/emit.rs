//! AST walker that lowers C constructs into stack-language tokens.
//!
//! Structured control flow (break/continue/switch fallthrough) has no
//! counterpart in a jump-less stack VM, so it is encoded with boolean flag
//! variables threaded through the loop/switch bodies: this is a deliberate
//! design choice, not a workaround.

use std::collections::HashSet;

use lang_c::ast::*;
use lang_c::span::Node;

enum BreakTarget {
    Loop { brk: String, cont: String },
    Switch { brk: String },
}

pub struct Emitter {
    tokens: Vec<String>,
    scopes: Vec<HashSet<String>>,
    targets: Vec<BreakTarget>,
    next_id: usize,
    pub errors: Vec<String>,
}

impl Emitter {
    pub fn new() -> Emitter {
        Emitter {
            tokens: Vec::new(),
            scopes: vec![HashSet::new()],
            targets: Vec::new(),
            next_id: 0,
            errors: Vec::new(),
        }
    }

    pub fn finish(self) -> String {
        self.tokens.join(" ")
    }

    fn emit(&mut self, tok: impl Into<String>) {
        self.tokens.push(tok.into());
    }

    fn fresh(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("__{prefix}_{}", self.next_id)
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare_local(&mut self, name: &str) {
        self.scopes.last_mut().unwrap().insert(name.to_string());
    }

    fn is_local(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|s| s.contains(name))
    }

    fn warn(&mut self, reason: impl Into<String>) {
        // Unsupported constructs are recorded but do not abort compilation by
        // themselves; only entries pushed to `errors` do that.
        self.errors.push(format!("warning: {}", reason.into()));
    }

    fn error(&mut self, reason: impl Into<String>) {
        self.errors.push(reason.into());
    }

    // --- top level -----------------------------------------------------

    pub fn compile_translation_unit(&mut self, unit: &TranslationUnit) {
        for decl in &unit.0 {
            self.compile_external(&decl.node);
        }
    }

    fn compile_external(&mut self, decl: &ExternalDeclaration) {
        match decl {
            ExternalDeclaration::FunctionDefinition(f) => self.compile_function(&f.node),
            ExternalDeclaration::Declaration(d) => self.compile_declaration(&d.node),
            ExternalDeclaration::StaticAssert(_) => {}
        }
    }

    fn declarator_name(declarator: &Declarator) -> Option<String> {
        match &declarator.kind.node {
            DeclaratorKind::Identifier(id) => Some(id.node.name.clone()),
            _ => None,
        }
    }

    fn function_params(declarator: &Declarator) -> Vec<String> {
        for derived in &declarator.derived {
            if let DerivedDeclarator::Function(fd) = &derived.node {
                return fd
                    .node
                    .parameters
                    .iter()
                    .filter_map(|p| p.node.declarator.as_ref().and_then(|d| Self::declarator_name(&d.node)))
                    .collect();
            }
        }
        Vec::new()
    }

    fn compile_function(&mut self, f: &FunctionDefinition) {
        let name = match Self::declarator_name(&f.declarator.node) {
            Some(n) => n,
            None => {
                self.warn("function definition with no identifiable name");
                return;
            }
        };
        let params = Self::function_params(&f.declarator.node);

        self.emit("DEF");
        self.emit(name);
        self.push_scope();
        for p in params.iter().rev() {
            self.emit("VAR");
            self.emit(p.clone());
            self.declare_local(p);
            self.emit(p.clone());
            self.emit("PARAM");
        }
        self.compile_statement(&f.statement.node);
        self.pop_scope();
        self.emit("END");
    }

    // --- declarations ----------------------------------------------------

    fn array_length(declarator: &Declarator) -> Option<i64> {
        for derived in &declarator.derived {
            if let DerivedDeclarator::Array(arr) = &derived.node {
                if let ArraySize::StaticExpression(e) | ArraySize::VariableExpression(e) = &arr.node.size {
                    if let Expression::Constant(c) = &e.node {
                        if let Constant::Integer(i) = &c.node {
                            return i.number.parse::<i64>().ok();
                        }
                    }
                }
            }
        }
        None
    }

    fn is_array(declarator: &Declarator) -> bool {
        declarator
            .derived
            .iter()
            .any(|d| matches!(d.node, DerivedDeclarator::Array(_)))
    }

    fn compile_declaration(&mut self, decl: &Declaration) {
        for init in &decl.declarators {
            let declarator = &init.node.declarator.node;
            let name = match Self::declarator_name(declarator) {
                Some(n) => n,
                None => {
                    self.warn("declaration with no identifiable name");
                    continue;
                }
            };
            self.declare_local(&name);
            self.emit("VAR");
            self.emit(name.clone());

            if Self::is_array(declarator) {
                if init.node.initializer.is_some() {
                    self.warn(format!("array initializer list for {name:?} is not supported"));
                    continue;
                }
                match Self::array_length(declarator) {
                    Some(n) if n >= 0 => {
                        self.emit("[");
                        for _ in 0..n {
                            self.emit("0");
                        }
                        self.emit("]");
                        self.emit(name.clone());
                        self.emit("SWAP");
                        self.emit("STORE");
                    }
                    _ => self.warn(format!("could not determine array length for {name:?}")),
                }
                continue;
            }

            if let Some(initializer) = &init.node.initializer {
                if let Initializer::Expression(e) = &initializer.node {
                    self.compile_expression(&e.node);
                    self.emit(name.clone());
                    self.emit("SWAP");
                    self.emit("STORE");
                } else {
                    self.warn(format!("unsupported initializer for {name:?}"));
                }
            }
        }
    }

    // --- statements ------------------------------------------------------

    fn compile_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Compound(items) => self.compile_compound(items),
            Statement::Expression(Some(e)) => {
                let leaves_value = self.compile_expression(&e.node);
                if leaves_value {
                    self.emit("DROP");
                }
            }
            Statement::Expression(None) => {}
            Statement::If(i) => self.compile_if(&i.node),
            Statement::While(w) => self.compile_while(&w.node),
            Statement::DoWhile(d) => self.compile_dowhile(&d.node),
            Statement::For(f) => self.compile_for(&f.node),
            Statement::Switch(s) => self.compile_switch(&s.node),
            Statement::Break => self.compile_break(),
            Statement::Continue => self.compile_continue(),
            Statement::Return(expr) => {
                if let Some(e) = expr {
                    self.compile_expression(&e.node);
                }
                self.emit("RETURN");
            }
            Statement::Labeled(l) => {
                // Only CASE/DEFAULT labels are meaningful here; they are
                // consumed directly by compile_switch. A plain identifier
                // label (goto target) has no stack-language counterpart.
                self.warn("labeled statement outside switch is not supported");
                self.compile_statement(&l.node.statement.node);
            }
            _ => self.warn("unsupported statement"),
        }
    }

    fn compile_compound(&mut self, items: &[Node<BlockItem>]) {
        self.push_scope();
        for item in items {
            match &item.node {
                BlockItem::Declaration(d) => self.compile_declaration(&d.node),
                BlockItem::Statement(s) => self.compile_statement(&s.node),
                BlockItem::StaticAssert(_) => {}
            }
        }
        self.pop_scope();
    }

    fn compile_quoted(&mut self, stmt: &Statement) {
        self.emit("[");
        self.compile_statement(stmt);
        self.emit("]");
    }

    fn compile_if(&mut self, i: &IfStatement) {
        self.compile_expression(&i.condition.node);
        self.compile_quoted(&i.then_statement.node);
        match &i.else_statement {
            Some(else_stmt) => {
                self.compile_quoted(&else_stmt.node);
                self.emit("IFELSE");
            }
            None => self.emit("IFTRUE"),
        }
    }

    fn compile_loop_body(&mut self, body: &Statement, cont_name: &str) {
        self.emit("[");
        self.emit(cont_name.to_string());
        self.emit("FETCH");
        self.emit("NOT");
        self.emit("[");
        self.compile_statement(body);
        self.emit("]");
        self.emit("IFTRUE");
        self.emit("FALSE");
        self.emit(cont_name.to_string());
        self.emit("SWAP");
        self.emit("STORE");
        self.emit("]");
    }

    fn compile_while(&mut self, w: &WhileStatement) {
        let brk = self.fresh("BREAK");
        let cont = self.fresh("CONTINUE");
        self.emit("VAR");
        self.emit(brk.clone());
        self.emit("FALSE");
        self.emit(brk.clone());
        self.emit("SWAP");
        self.emit("STORE");
        self.emit("VAR");
        self.emit(cont.clone());
        self.emit("FALSE");
        self.emit(cont.clone());
        self.emit("SWAP");
        self.emit("STORE");

        self.emit("[");
        self.emit(brk.clone());
        self.emit("FETCH");
        self.emit("NOT");
        self.compile_expression(&w.expression.node);
        self.emit("AND");
        self.emit("]");

        self.targets.push(BreakTarget::Loop { brk: brk.clone(), cont: cont.clone() });
        self.compile_loop_body(&w.statement.node, &cont);
        self.targets.pop();

        self.emit("WHILE");
    }

    fn compile_dowhile(&mut self, d: &DoWhileStatement) {
        let brk = self.fresh("BREAK");
        let cont = self.fresh("CONTINUE");
        self.emit("VAR");
        self.emit(brk.clone());
        self.emit("FALSE");
        self.emit(brk.clone());
        self.emit("SWAP");
        self.emit("STORE");
        self.emit("VAR");
        self.emit(cont.clone());
        self.emit("FALSE");
        self.emit(cont.clone());
        self.emit("SWAP");
        self.emit("STORE");

        self.targets.push(BreakTarget::Loop { brk: brk.clone(), cont: cont.clone() });
        self.compile_loop_body(&d.statement.node, &cont);
        self.targets.pop();

        self.emit("[");
        self.emit(brk.clone());
        self.emit("FETCH");
        self.emit("NOT");
        self.compile_expression(&d.expression.node);
        self.emit("AND");
        self.emit("]");

        self.emit("DOWHILE");
    }

    fn compile_for(&mut self, f: &ForStatement) {
        self.push_scope();
        match &f.initializer.node {
            ForInitializer::Empty => {}
            ForInitializer::Expression(e) => {
                let leaves_value = self.compile_expression(&e.node);
                if leaves_value {
                    self.emit("DROP");
                }
            }
            ForInitializer::Declaration(d) => self.compile_declaration(&d.node),
            ForInitializer::StaticAssert(_) => {}
        }

        let brk = self.fresh("BREAK");
        let cont = self.fresh("CONTINUE");
        self.emit("VAR");
        self.emit(brk.clone());
        self.emit("FALSE");
        self.emit(brk.clone());
        self.emit("SWAP");
        self.emit("STORE");
        self.emit("VAR");
        self.emit(cont.clone());
        self.emit("FALSE");
        self.emit(cont.clone());
        self.emit("SWAP");
        self.emit("STORE");

        self.emit("[");
        self.emit(brk.clone());
        self.emit("FETCH");
        self.emit("NOT");
        match &f.condition {
            Some(c) => {
                self.compile_expression(&c.node);
            }
            None => self.emit("TRUE"),
        }
        self.emit("AND");
        self.emit("]");

        self.targets.push(BreakTarget::Loop { brk: brk.clone(), cont: cont.clone() });
        self.emit("[");
        self.emit(cont.clone());
        self.emit("FETCH");
        self.emit("NOT");
        self.emit("[");
        self.compile_statement(&f.statement.node);
        self.emit("]");
        self.emit("IFTRUE");
        self.emit("FALSE");
        self.emit(cont.clone());
        self.emit("SWAP");
        self.emit("STORE");
        if let Some(step) = &f.step {
            let leaves_value = self.compile_expression(&step.node);
            if leaves_value {
                self.emit("DROP");
            }
        }
        self.emit("]");
        self.targets.pop();

        self.emit("WHILE");
        self.pop_scope();
    }

    fn compile_break(&mut self) {
        match self.targets.last() {
            Some(BreakTarget::Loop { brk, .. }) | Some(BreakTarget::Switch { brk }) => {
                let brk = brk.clone();
                self.emit(brk);
                self.emit("TRUE");
                self.emit("SWAP");
                self.emit("STORE");
            }
            None => self.warn("break outside a loop or switch"),
        }
    }

    fn compile_continue(&mut self) {
        for target in self.targets.iter().rev() {
            if let BreakTarget::Loop { cont, .. } = target {
                let cont = cont.clone();
                self.emit(cont);
                self.emit("TRUE");
                self.emit("SWAP");
                self.emit("STORE");
                return;
            }
        }
        self.warn("continue outside a loop");
    }

    /// Collect the (optional) case-value and body statement of a switch
    /// child, unwrapping labeled statements: `case v: body` / `default: body`.
    fn switch_cases(stmt: &Statement) -> Vec<(Option<Node<Expression>>, Statement)> {
        let mut cases = Vec::new();
        if let Statement::Compound(items) = stmt {
            let mut pending: Option<Option<Node<Expression>>> = None;
            let mut body_items: Vec<Node<BlockItem>> = Vec::new();
            for item in items {
                if let BlockItem::Statement(s) = &item.node {
                    if let Statement::Labeled(l) = &s.node {
                        if let Label::Case(e) = &l.node.label.node {
                            if let Some(key) = pending.take() {
                                cases.push((key, Statement::Compound(std::mem::take(&mut body_items))));
                            }
                            pending = Some(Some(*e.clone()));
                            body_items.push(Node::new(BlockItem::Statement(*l.node.statement.clone()), item.span));
                            continue;
                        } else if matches!(l.node.label.node, Label::Default) {
                            if let Some(key) = pending.take() {
                                cases.push((key, Statement::Compound(std::mem::take(&mut body_items))));
                            }
                            pending = Some(None);
                            body_items.push(Node::new(BlockItem::Statement(*l.node.statement.clone()), item.span));
                            continue;
                        }
                    }
                }
                body_items.push(item.clone());
            }
            if let Some(key) = pending.take() {
                cases.push((key, Statement::Compound(body_items)));
            }
        }
        cases
    }

    fn compile_switch(&mut self, s: &SwitchStatement) {
        let expr_name = self.fresh("SWITCH_EXPR");
        let brk = self.fresh("SWITCH_BREAK");
        self.emit("VAR");
        self.emit(expr_name.clone());
        self.compile_expression(&s.expression.node);
        self.emit(expr_name.clone());
        self.emit("SWAP");
        self.emit("STORE");
        self.emit("VAR");
        self.emit(brk.clone());
        self.emit("FALSE");
        self.emit(brk.clone());
        self.emit("SWAP");
        self.emit("STORE");

        self.targets.push(BreakTarget::Switch { brk: brk.clone() });
        for (case_value, body) in Self::switch_cases(&s.statement.node) {
            match case_value {
                Some(e) => {
                    self.emit(expr_name.clone());
                    self.emit("FETCH");
                    self.compile_expression(&e.node);
                    self.emit("==");
                    self.emit(brk.clone());
                    self.emit("FETCH");
                    self.emit("NOT");
                    self.emit("AND");
                }
                None => {
                    self.emit(brk.clone());
                    self.emit("FETCH");
                    self.emit("NOT");
                }
            }
            self.compile_quoted(&body);
            self.emit("IFTRUE");
        }
        self.targets.pop();
    }

    // --- expressions -------------------------------------------------------
    // Returns whether the emitted code leaves a value on the stack.

    fn compile_expression(&mut self, expr: &Expression) -> bool {
        match expr {
            Expression::Identifier(id) => {
                let name = &id.node.name;
                if self.is_local(name) {
                    self.emit(name.clone());
                    self.emit("FETCH");
                } else {
                    self.emit(name.clone());
                }
                true
            }
            Expression::Constant(c) => {
                self.emit_constant(&c.node);
                true
            }
            Expression::StringLiteral(s) => {
                let joined = s.node.join("");
                self.emit(format!("\"{joined}\""));
                true
            }
            Expression::BinaryOperator(b) => self.compile_binary(&b.node),
            Expression::UnaryOperator(u) => self.compile_unary(&u.node),
            Expression::Conditional(c) => {
                self.compile_expression(&c.node.condition.node);
                self.emit("[");
                self.compile_expression(&c.node.then_expression.node);
                self.emit("]");
                self.emit("[");
                self.compile_expression(&c.node.else_expression.node);
                self.emit("]");
                self.emit("IFELSE");
                true
            }
            Expression::Call(call) => {
                for arg in &call.node.arguments {
                    self.compile_expression(&arg.node);
                }
                self.compile_expression(&call.node.callee.node);
                true
            }
            Expression::Cast(c) => self.compile_expression(&c.node.expression.node),
            Expression::Comma(exprs) => {
                let mut last = false;
                for (i, e) in exprs.iter().enumerate() {
                    let leaves_value = self.compile_expression(&e.node);
                    if i + 1 < exprs.len() && leaves_value {
                        self.emit("DROP");
                    }
                    last = leaves_value;
                }
                last
            }
            _ => {
                self.warn("unsupported expression");
                self.emit("0");
                true
            }
        }
    }

    fn emit_constant(&mut self, c: &Constant) {
        match c {
            Constant::Integer(i) => self.emit(i.number.to_string()),
            Constant::Float(f) => self.emit(f.number.to_string()),
            Constant::Character(ch) => self.emit(ch.to_string()),
        }
    }

    /// Compile an lvalue-producing expression down to its variable name, for
    /// use as the target of a store. Only plain identifiers and single-level
    /// array indexing are supported.
    fn compile_lvalue_store(&mut self, lhs: &Expression) {
        match lhs {
            Expression::Identifier(id) => {
                self.emit(id.node.name.clone());
                self.emit("SWAP");
                self.emit("STORE");
            }
            Expression::BinaryOperator(b) if matches!(b.node.operator.node, BinaryOperator::Index) => {
                match &b.node.lhs.node {
                    Expression::Identifier(id) => {
                        let array_name = id.node.name.clone();
                        self.emit(array_name.clone());
                        self.emit("FETCH");
                        self.compile_expression(&b.node.rhs.node);
                        self.emit("STORE_ITEM");
                        self.emit(array_name);
                        self.emit("SWAP");
                        self.emit("STORE");
                    }
                    _ => self.warn("only single-dimension array stores are supported"),
                }
            }
            _ => self.warn("unsupported assignment target"),
        }
    }

    fn compile_lvalue_fetch(&mut self, lhs: &Expression) {
        match lhs {
            Expression::Identifier(id) => {
                let name = id.node.name.clone();
                self.emit(name);
                self.emit("FETCH");
            }
            Expression::BinaryOperator(b) if matches!(b.node.operator.node, BinaryOperator::Index) => {
                self.compile_expression(&b.node.lhs.node);
                self.compile_expression(&b.node.rhs.node);
                self.emit("ITEM");
            }
            _ => self.warn("unsupported lvalue"),
        }
    }

    fn compile_binary(&mut self, b: &BinaryOperatorExpression) -> bool {
        use BinaryOperator::*;
        match &b.operator.node {
            Assign => {
                self.compile_expression(&b.rhs.node);
                self.compile_lvalue_store(&b.lhs.node);
                false
            }
            AssignPlus | AssignMinus | AssignMultiply | AssignDivide | AssignModulo | AssignShiftLeft
            | AssignShiftRight | AssignBitwiseAnd | AssignBitwiseXor | AssignBitwiseOr => {
                self.compile_lvalue_fetch(&b.lhs.node);
                self.compile_expression(&b.rhs.node);
                self.emit(compound_op_word(&b.operator.node));
                self.compile_lvalue_store(&b.lhs.node);
                false
            }
            Index => {
                self.compile_expression(&b.lhs.node);
                self.compile_expression(&b.rhs.node);
                self.emit("ITEM");
                true
            }
            LogicalAnd => {
                self.compile_expression(&b.lhs.node);
                self.compile_expression(&b.rhs.node);
                self.emit("AND");
                true
            }
            LogicalOr => {
                self.compile_expression(&b.lhs.node);
                self.compile_expression(&b.rhs.node);
                self.emit("OR");
                true
            }
            other => {
                self.compile_expression(&b.lhs.node);
                self.compile_expression(&b.rhs.node);
                self.emit(binary_op_word(other));
                true
            }
        }
    }

    fn compile_unary(&mut self, u: &UnaryOperatorExpression) -> bool {
        use UnaryOperator::*;
        match &u.operator.node {
            PostIncrement | PostDecrement => {
                self.compile_lvalue_fetch(&u.operand.node);
                self.emit("DUP");
                self.emit("1");
                self.emit(if matches!(u.operator.node, PostIncrement) { "+" } else { "-" });
                self.compile_lvalue_store(&u.operand.node);
                true
            }
            PreIncrement | PreDecrement => {
                self.compile_lvalue_fetch(&u.operand.node);
                self.emit("1");
                self.emit(if matches!(u.operator.node, PreIncrement) { "+" } else { "-" });
                self.compile_lvalue_store(&u.operand.node);
                self.compile_lvalue_fetch(&u.operand.node);
                true
            }
            Minus => {
                self.compile_expression(&u.operand.node);
                self.emit("NEGATE");
                true
            }
            Plus => self.compile_expression(&u.operand.node),
            Negate => {
                self.compile_expression(&u.operand.node);
                self.emit("NOT");
                true
            }
            Complement => {
                self.compile_expression(&u.operand.node);
                self.emit("BITNOT");
                true
            }
            Address | Indirection => {
                self.warn("pointer/address-of/sizeof operators are not supported");
                self.emit("0");
                true
            }
        }
    }
}

fn binary_op_word(op: &BinaryOperator) -> &'static str {
    use BinaryOperator::*;
    match op {
        Plus => "+",
        Minus => "-",
        Multiply => "*",
        Divide => "/",
        Modulo => "%",
        ShiftLeft => "<<",
        ShiftRight => ">>",
        Less => "<",
        Greater => ">",
        LessOrEqual => "<=",
        GreaterOrEqual => ">=",
        Equals => "==",
        NotEquals => "!=",
        BitwiseAnd => "&",
        BitwiseXor => "^",
        BitwiseOr => "|",
        _ => "+",
    }
}

fn compound_op_word(op: &BinaryOperator) -> &'static str {
    use BinaryOperator::*;
    match op {
        AssignPlus => "+",
        AssignMinus => "-",
        AssignMultiply => "*",
        AssignDivide => "/",
        AssignModulo => "%",
        AssignShiftLeft => "<<",
        AssignShiftRight => ">>",
        AssignBitwiseAnd => "&",
        AssignBitwiseXor => "^",
        AssignBitwiseOr => "|",
        _ => "+",
    }
}
