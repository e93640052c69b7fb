//! The built-in function table seeded into the root environment, per spec
//! §4.3's table: `print`, `puts`, `len`, `int`, `float`, `str`, `type`.

use std::rc::Rc;

use crate::environment::Env;
use crate::types::Type;
use crate::value::Value;

pub fn register_builtins(env: &Env) {
    env.register_builtin(
        "print",
        vec![Type::Any],
        Type::Nil,
        Rc::new(|args| {
            println!("{}", args[0].inspect());
            Value::Nil
        }),
    );
    env.register_builtin(
        "puts",
        vec![Type::Any],
        Type::Nil,
        Rc::new(|args| {
            println!("{}", args[0].inspect());
            Value::Nil
        }),
    );
    env.register_builtin(
        "len",
        vec![Type::Any],
        Type::Int,
        Rc::new(|args| match &args[0] {
            Value::String(s) => Value::Integer(s.len() as i64),
            Value::Array(elements) => Value::Integer(elements.borrow().len() as i64),
            other => Value::Error(format!("len: unsupported operand {}", other.vibe_type())),
        }),
    );
    env.register_builtin(
        "int",
        vec![Type::Any],
        Type::Int,
        Rc::new(|args| match &args[0] {
            Value::Integer(n) => Value::Integer(*n),
            Value::Float(f) => Value::Integer(*f as i64),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Error(format!("cannot parse \"{}\" as int", s))),
            other => Value::Error(format!("int: unsupported operand {}", other.vibe_type())),
        }),
    );
    env.register_builtin(
        "float",
        vec![Type::Any],
        Type::Float,
        Rc::new(|args| match &args[0] {
            Value::Float(f) => Value::Float(*f),
            Value::Integer(n) => Value::Float(*n as f64),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Error(format!("cannot parse \"{}\" as float", s))),
            other => Value::Error(format!("float: unsupported operand {}", other.vibe_type())),
        }),
    );
    env.register_builtin(
        "str",
        vec![Type::Any],
        Type::String,
        Rc::new(|args| Value::String(args[0].to_display_string())),
    );
    env.register_builtin(
        "type",
        vec![Type::Any],
        Type::String,
        Rc::new(|args| Value::String(args[0].vibe_type().to_string())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_reports_byte_length_and_element_count() {
        let env = Env::root();
        register_builtins(&env);
        let len = env.get("len").unwrap();
        let Value::Builtin(b) = len else { panic!("expected builtin") };
        assert!(matches!((b.native_fn)(&[Value::String("hello".into())]), Value::Integer(5)));
        assert!(matches!(
            (b.native_fn)(&[Value::array(vec![Value::Integer(1), Value::Integer(2)])]),
            Value::Integer(2)
        ));
        assert!((b.native_fn)(&[Value::Integer(1)]).is_error());
    }

    #[test]
    fn int_truncates_floats_and_parses_strings() {
        let env = Env::root();
        register_builtins(&env);
        let Value::Builtin(b) = env.get("int").unwrap() else { panic!("expected builtin") };
        assert!(matches!((b.native_fn)(&[Value::Float(3.9)]), Value::Integer(3)));
        assert!(matches!((b.native_fn)(&[Value::String("42".into())]), Value::Integer(42)));
        assert!((b.native_fn)(&[Value::String("nope".into())]).is_error());
    }

    #[test]
    fn float_widens_ints_and_parses_strings() {
        let env = Env::root();
        register_builtins(&env);
        let Value::Builtin(b) = env.get("float").unwrap() else { panic!("expected builtin") };
        assert!(matches!((b.native_fn)(&[Value::Integer(3)]), Value::Float(f) if f == 3.0));
        assert!(matches!((b.native_fn)(&[Value::String("3.5".into())]), Value::Float(f) if f == 3.5));
    }

    #[test]
    fn str_uses_canonical_display_conversion() {
        let env = Env::root();
        register_builtins(&env);
        let Value::Builtin(b) = env.get("str").unwrap() else { panic!("expected builtin") };
        match (b.native_fn)(&[Value::Bool(true)]) {
            Value::String(s) => assert_eq!(s, "true"),
            other => panic!("expected String, got {:?}", other),
        }
    }

    #[test]
    fn type_returns_the_vibe_type_name() {
        let env = Env::root();
        register_builtins(&env);
        let Value::Builtin(b) = env.get("type").unwrap() else { panic!("expected builtin") };
        match (b.native_fn)(&[Value::array(vec![Value::Integer(1)])]) {
            Value::String(s) => assert_eq!(s, "Array<int>"),
            other => panic!("expected String, got {:?}", other),
        }
    }
}
