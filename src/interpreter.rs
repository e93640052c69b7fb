//! The tree-walking evaluator: `eval(node, env) -> Value`, per spec §4.3.

use std::rc::Rc;

use crate::ast::{AssignTarget, BinaryOp, Node, TypeAnnotation, UnaryOp};
use crate::environment::Env;
use crate::intern::Interner;
use crate::types::Type;
use crate::value::{FunctionValue, Value};

/// Walks an AST against an environment chain. Borrows the `Interner` that
/// produced the AST's symbols so it can resolve identifiers and type
/// annotations back to strings without a second copy of the symbol table.
pub struct Interpreter<'i> {
    interner: &'i Interner,
}

impl<'i> Interpreter<'i> {
    pub fn new(interner: &'i Interner) -> Self {
        Interpreter { interner }
    }

    /// Evaluate a whole program against `env`. A stray top-level `return`
    /// (no enclosing function call to unwind to) is treated as terminating
    /// evaluation immediately with its unwrapped value.
    pub fn eval_program(&self, program: &Node, env: &Env) -> Value {
        let Node::Program { statements } = program else {
            panic!("eval_program called on a non-Program node");
        };
        match self.eval_block(statements, env) {
            Value::Return(inner) => *inner,
            other => other,
        }
    }

    fn eval_block(&self, statements: &[Node], env: &Env) -> Value {
        let mut result = Value::Nil;
        for statement in statements {
            result = self.eval(statement, env);
            if matches!(result, Value::Return(_)) || result.is_error() {
                return result;
            }
        }
        result
    }

    fn resolve(&self, sym: crate::intern::Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Surface type annotation -> `Type`. Generics resolve their element
    /// eagerly; unions resolve every member. An annotation whose name is
    /// none of the basic/array/union names (i.e. a user class name) resolves
    /// to `Any`, since class semantics are an open question left out of this
    /// core (spec §9).
    fn resolve_type(&self, annotation: &TypeAnnotation) -> Type {
        match self.resolve(annotation.type_name) {
            "int" => Type::Int,
            "float" => Type::Float,
            "string" => Type::String,
            "bool" => Type::Bool,
            "nil" => Type::Nil,
            "any" => Type::Any,
            "Array" => {
                let element = annotation
                    .type_params
                    .first()
                    .map(|p| self.resolve_type(p))
                    .unwrap_or(Type::Any);
                Type::array(element)
            }
            "union" => Type::Union(annotation.type_params.iter().map(|p| self.resolve_type(p)).collect()),
            _ => Type::Any,
        }
    }

    pub fn eval(&self, node: &Node, env: &Env) -> Value {
        match node {
            Node::IntegerLiteral(n) => Value::Integer(*n),
            Node::FloatLiteral(f) => Value::Float(*f),
            Node::StringLiteral(s) => Value::String(s.clone()),
            Node::BoolLiteral(b) => Value::Bool(*b),
            Node::NilLiteral => Value::Nil,

            Node::Identifier(sym) => {
                let name = self.resolve(*sym);
                env.get(name).unwrap_or_else(|| Value::Error(format!("identifier not found: {}", name)))
            }

            // Instance variables and `self` are only meaningful with a live
            // class/object dispatch protocol, which spec §9 leaves as an
            // open question. As a deliberate simplification, `@field` reads
            // and writes a plain environment slot named `@field`, so scripts
            // that use instance-var syntax without real classes still
            // behave deterministically; `self` stubs to `Nil`.
            Node::InstanceVar(sym) => {
                let name = format!("@{}", self.resolve(*sym));
                env.get(&name).unwrap_or(Value::Nil)
            }
            Node::SelfExpr => Value::Nil,

            Node::ArrayLiteral { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let v = self.eval(element, env);
                    if v.is_error() {
                        return v;
                    }
                    values.push(v);
                }
                Value::array(values)
            }

            Node::UnaryExpr { op, right } => {
                let value = self.eval(right, env);
                if value.is_error() {
                    return value;
                }
                eval_unary(*op, &value)
            }

            Node::BinaryExpr { left, op, right } => {
                let l = self.eval(left, env);
                let r = self.eval(right, env);
                if l.is_error() {
                    return l;
                }
                if r.is_error() {
                    return r;
                }
                eval_binary(*op, &l, &r)
            }

            Node::IndexExpr { array, index } => {
                let array_value = self.eval(array, env);
                if array_value.is_error() {
                    return array_value;
                }
                let index_value = self.eval(index, env);
                if index_value.is_error() {
                    return index_value;
                }
                match (&array_value, &index_value) {
                    (Value::Array(elements), Value::Integer(i)) => {
                        let elements = elements.borrow();
                        usize::try_from(*i).ok().and_then(|i| elements.get(i).cloned()).unwrap_or(Value::Nil)
                    }
                    (Value::Array(_), other) => {
                        Value::Error(format!("array index must be an integer, got {}", other.vibe_type()))
                    }
                    (other, _) => Value::Error(format!("cannot index into {}", other.vibe_type())),
                }
            }

            // Class/object member access is stubbed per spec §9.
            Node::DotExpr { .. } | Node::MethodCall { .. } => Value::Nil,

            Node::CallExpr { function, args } => self.eval_call(function, args, env),

            Node::Assignment { name, value } => {
                let v = self.eval(value, env);
                if v.is_error() {
                    return v;
                }
                let key = match name {
                    AssignTarget::Identifier(sym) => self.resolve(*sym).to_string(),
                    AssignTarget::InstanceVar(sym) => format!("@{}", self.resolve(*sym)),
                };
                match env.assign(&key, v.clone()) {
                    Ok(()) => v,
                    Err(message) => Value::Error(message),
                }
            }

            Node::VariableDecl { name, type_annotation, value } => {
                let v = match value {
                    Some(expr) => self.eval(expr, env),
                    None => Value::Nil,
                };
                if v.is_error() {
                    return v;
                }
                let name = self.resolve(*name);
                match type_annotation {
                    Some(annotation) => {
                        let declared = self.resolve_type(annotation);
                        if !Type::is_assignable(&v.vibe_type(), &declared) {
                            return Value::Error(format!(
                                "cannot assign value of type {} to `{}` of type {}",
                                v.vibe_type(),
                                name,
                                declared
                            ));
                        }
                        env.define_typed(name, v.clone(), declared);
                    }
                    None => env.define(name, v.clone()),
                }
                v
            }

            Node::TypeAnnotationExpr(_) | Node::TypeDeclaration { .. } => Value::Nil,

            Node::BlockStmt { statements } => self.eval_block(statements, env),

            Node::IfStmt { condition, consequence, elsif_blocks, alternative } => {
                let cond = self.eval(condition, env);
                if cond.is_error() {
                    return cond;
                }
                if cond.is_truthy() {
                    return self.eval_block(consequence, &Env::new_enclosed(env));
                }
                for arm in elsif_blocks {
                    let arm_cond = self.eval(&arm.condition, env);
                    if arm_cond.is_error() {
                        return arm_cond;
                    }
                    if arm_cond.is_truthy() {
                        return self.eval_block(&arm.consequence, &Env::new_enclosed(env));
                    }
                }
                match alternative {
                    Some(body) => self.eval_block(body, &Env::new_enclosed(env)),
                    None => Value::Nil,
                }
            }

            Node::WhileStmt { condition, body } => loop {
                let cond = self.eval(condition, env);
                if cond.is_error() {
                    return cond;
                }
                if !cond.is_truthy() {
                    return Value::Nil;
                }
                let result = self.eval_block(body, &Env::new_enclosed(env));
                if matches!(result, Value::Return(_)) || result.is_error() {
                    return result;
                }
            },

            Node::ForStmt { iterator, iterable, body } => {
                let iterable_value = self.eval(iterable, env);
                if iterable_value.is_error() {
                    return iterable_value;
                }
                let elements = match &iterable_value {
                    Value::Array(elements) => elements.borrow().clone(),
                    other => return Value::Error(format!("for loop requires an array, got {}", other.vibe_type())),
                };
                let iterator_name = self.resolve(*iterator);
                for element in elements {
                    let body_env = Env::new_enclosed(env);
                    body_env.define(iterator_name, element);
                    let result = self.eval_block(body, &body_env);
                    if matches!(result, Value::Return(_)) || result.is_error() {
                        return result;
                    }
                }
                Value::Nil
            }

            Node::ReturnStmt { value } => {
                let v = match value {
                    Some(expr) => self.eval(expr, env),
                    None => Value::Nil,
                };
                Value::Return(Box::new(v))
            }

            Node::FunctionDef { name, parameters, return_type, body } => {
                let param_types = parameters
                    .iter()
                    .map(|p| p.type_annotation.as_ref().map(|a| self.resolve_type(a)).unwrap_or(Type::Any))
                    .collect();
                let resolved_return = return_type.as_ref().map(|a| self.resolve_type(a)).unwrap_or(Type::Any);
                let function = Rc::new(FunctionValue {
                    name: name.map(|sym| self.resolve(sym).to_string()),
                    parameters: parameters.clone(),
                    param_types,
                    body: body.clone(),
                    return_type: resolved_return,
                    captured_env: env.clone(),
                });
                let value = Value::Function(function);
                if let Some(sym) = name {
                    env.define(self.resolve(*sym), value.clone());
                }
                value
            }

            // Class/object evaluation is left for a follow-on deliverable
            // (spec §9); the grammar parses these but evaluation stubs to
            // Nil rather than guessing an instantiation/dispatch protocol.
            Node::ClassDef { .. } | Node::ClassInst { .. } => Value::Nil,

            Node::RequireStmt { .. } => Value::Nil,
            Node::PrintStmt { value } => {
                let v = self.eval(value, env);
                if v.is_error() {
                    return v;
                }
                println!("{}", v.inspect());
                Value::Nil
            }

            Node::Program { statements } => self.eval_block(statements, env),
        }
    }

    fn eval_call(&self, function: &Node, args: &[Node], env: &Env) -> Value {
        let callee = self.eval(function, env);
        if callee.is_error() {
            return callee;
        }
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let v = self.eval(arg, env);
            if v.is_error() {
                return v;
            }
            arg_values.push(v);
        }

        match &callee {
            Value::Builtin(builtin) => {
                if arg_values.len() != builtin.param_types.len() {
                    return Value::Error(format!(
                        "{}: expected {} argument(s), got {}",
                        builtin.name,
                        builtin.param_types.len(),
                        arg_values.len()
                    ));
                }
                for (arg, expected) in arg_values.iter().zip(&builtin.param_types) {
                    if !Type::is_assignable(&arg.vibe_type(), expected) {
                        return Value::Error(format!(
                            "{}: argument of type {} is not assignable to {}",
                            builtin.name,
                            arg.vibe_type(),
                            expected
                        ));
                    }
                }
                (builtin.native_fn)(&arg_values)
            }
            Value::Function(f) => self.call_function(f, arg_values),
            other => Value::Error(format!("{} is not callable", other.vibe_type())),
        }
    }

    fn call_function(&self, f: &Rc<FunctionValue>, args: Vec<Value>) -> Value {
        if args.len() != f.parameters.len() {
            return Value::Error(format!(
                "{}: expected {} argument(s), got {}",
                f.name.as_deref().unwrap_or("<anonymous>"),
                f.parameters.len(),
                args.len()
            ));
        }
        let call_env = Env::new_enclosed(&f.captured_env);
        for ((param, declared), arg) in f.parameters.iter().zip(&f.param_types).zip(args) {
            if param.type_annotation.is_some() {
                if !Type::is_assignable(&arg.vibe_type(), declared) {
                    return Value::Error(format!(
                        "parameter `{}` expects {}, got {}",
                        self.resolve(param.name),
                        declared,
                        arg.vibe_type()
                    ));
                }
                call_env.define_typed(self.resolve(param.name), arg, declared.clone());
            } else {
                call_env.define(self.resolve(param.name), arg);
            }
        }
        let result = self.eval_block(&f.body, &call_env);
        let unwrapped = match result {
            Value::Return(inner) => *inner,
            other => other,
        };
        if unwrapped.is_error() {
            return unwrapped;
        }
        if !Type::is_assignable(&unwrapped.vibe_type(), &f.return_type) {
            return Value::Error(format!(
                "{}: return value of type {} is not assignable to declared return type {}",
                f.name.as_deref().unwrap_or("<anonymous>"),
                unwrapped.vibe_type(),
                f.return_type
            ));
        }
        unwrapped
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> Value {
    match op {
        UnaryOp::Neg => match value {
            Value::Integer(n) => Value::Integer(-n),
            Value::Float(f) => Value::Float(-f),
            other => Value::Error(format!("unsupported operator - for {}", other.vibe_type())),
        },
        UnaryOp::Not => Value::Bool(!value.is_truthy()),
    }
}

fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => binary_int(op, *a, *b),
        (Value::Integer(a), Value::Float(b)) => binary_float(op, *a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => binary_float(op, *a, *b as f64),
        (Value::Float(a), Value::Float(b)) => binary_float(op, *a, *b),
        (Value::String(a), Value::String(b)) => binary_string(op, a, b),
        (Value::String(a), other) if op == BinaryOp::Add => Value::String(format!("{}{}", a, other.inspect())),
        (other, Value::String(b)) if op == BinaryOp::Add => Value::String(format!("{}{}", other.inspect(), b)),
        (Value::Bool(a), Value::Bool(b)) => binary_bool(op, *a, *b),
        _ => match op {
            BinaryOp::Eq => Value::Bool(left.inspect() == right.inspect()),
            BinaryOp::NotEq => Value::Bool(left.inspect() != right.inspect()),
            _ => Value::Error(format!(
                "unsupported operator {} for {} and {}",
                op.as_str(),
                left.vibe_type(),
                right.vibe_type()
            )),
        },
    }
}

fn binary_int(op: BinaryOp, a: i64, b: i64) -> Value {
    match op {
        BinaryOp::Add => Value::Integer(a + b),
        BinaryOp::Sub => Value::Integer(a - b),
        BinaryOp::Mul => Value::Integer(a * b),
        BinaryOp::Div => {
            if b == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(a / b) // truncates toward zero, per P7
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(a % b)
            }
        }
        BinaryOp::Pow => {
            if b < 0 {
                Value::Float((a as f64).powf(b as f64))
            } else {
                Value::Integer(a.pow(b as u32))
            }
        }
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::And | BinaryOp::Or => {
            Value::Error(format!("unsupported operator {} for int and int", op.as_str()))
        }
    }
}

fn binary_float(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Float(a / b)
            }
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Float(a % b)
            }
        }
        BinaryOp::Pow => Value::Float(a.powf(b)),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::And | BinaryOp::Or => {
            Value::Error(format!("unsupported operator {} for float and float", op.as_str()))
        }
    }
}

fn binary_string(op: BinaryOp, a: &str, b: &str) -> Value {
    match op {
        BinaryOp::Add => Value::String(format!("{}{}", a, b)),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        _ => Value::Error(format!("unsupported operator {} for string and string", op.as_str())),
    }
}

fn binary_bool(op: BinaryOp, a: bool, b: bool) -> Value {
    match op {
        BinaryOp::And => Value::Bool(a && b),
        BinaryOp::Or => Value::Bool(a || b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        _ => Value::Error(format!("unsupported operator {} for bool and bool", op.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn run(source: &str) -> Value {
        let mut interner = Interner::new();
        let (program, diagnostics) = parser::parse(source, &mut interner);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
        let interpreter = Interpreter::new(&interner);
        let env = Env::root();
        crate::builtins::register_builtins(&env);
        interpreter.eval_program(&program, &env)
    }

    #[test]
    fn scenario_1_sum_of_two_variables() {
        assert!(matches!(run("x = 5\ny = 10\nz = x + y\nz"), Value::Integer(15)));
    }

    #[test]
    fn scenario_2_typed_if_else() {
        assert!(matches!(
            run("x: int = 10\ny: int = 0\nif x > 5 do\n  y = 1\nelse\n  y = 2\nend\ny"),
            Value::Integer(1)
        ));
    }

    #[test]
    fn scenario_3_for_loop_accumulation() {
        assert!(matches!(
            run("sum = 0\nfor i in [1, 2, 3, 4, 5] do\n  sum = sum + i\nend\nsum"),
            Value::Integer(15)
        ));
    }

    #[test]
    fn scenario_4_typed_function_call() {
        assert!(matches!(
            run("def add(x: int, y: int): int do\n  x + y\nend\nadd(2, 5)"),
            Value::Integer(7)
        ));
    }

    #[test]
    fn scenario_5_closure_over_outer_parameter() {
        assert!(matches!(
            run(
                "def makeAdder(x: int) do\n  def(y: int): int do\n    return x + y\n  end\nend\nadd2 = makeAdder(2)\nadd2(2)"
            ),
            Value::Integer(4)
        ));
    }

    #[test]
    fn scenario_6_string_concatenation() {
        match run(r#""hello" + " " + "world""#) {
            Value::String(s) => assert_eq!(s, "hello world"),
            other => panic!("expected String, got {:?}", other),
        }
    }

    #[test]
    fn scenario_7_type_error_on_incompatible_assignment() {
        assert!(run(r#"a: int = "thirty""#).is_error());
    }

    #[test]
    fn scenario_8_division_by_zero() {
        match run("10 / 0") {
            Value::Error(msg) => assert_eq!(msg, "division by zero"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn property_p6_closure_observes_later_mutation() {
        let mut interner = Interner::new();
        let (program, diagnostics) = parser::parse(
            "counter = 0\ndef bump() do\n  counter = counter + 1\n  counter\nend\nbump()\nbump()",
            &mut interner,
        );
        assert!(diagnostics.is_empty());
        let interpreter = Interpreter::new(&interner);
        let env = Env::root();
        crate::builtins::register_builtins(&env);
        assert!(matches!(interpreter.eval_program(&program, &env), Value::Integer(2)));
    }

    #[test]
    fn out_of_range_index_yields_nil_not_error() {
        assert!(matches!(run("[1, 2, 3][10]"), Value::Nil));
    }

    #[test]
    fn arity_mismatch_is_a_type_level_error() {
        assert!(run("def add(x: int, y: int): int do\n  x + y\nend\nadd(1)").is_error());
    }

    #[test]
    fn builtin_len_and_type_and_str() {
        assert!(matches!(run("len(\"hello\")"), Value::Integer(5)));
        match run("type(1)") {
            Value::String(s) => assert_eq!(s, "int"),
            other => panic!("expected String, got {:?}", other),
        }
        match run("str(42)") {
            Value::String(s) => assert_eq!(s, "42"),
            other => panic!("expected String, got {:?}", other),
        }
    }
}
