//! The nominal `Type` system: structural equality and the assignability
//! relation, per spec §3 (I1, I2) and §8 (P3-P5).

use std::fmt;
use std::rc::Rc;

/// The closed set of nominal types.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Nil,
    Any,
    Array(Rc<Type>),
    Function { params: Vec<Type>, result: Rc<Type> },
    Union(Vec<Type>),
    Object { properties: Vec<(String, Type)> },
}

impl Type {
    pub fn array(element: Type) -> Type {
        Type::Array(Rc::new(element))
    }

    pub fn function(params: Vec<Type>, result: Type) -> Type {
        Type::Function { params, result: Rc::new(result) }
    }

    /// Structural equality: reflexive, symmetric, transitive (spec I1).
    pub fn equal(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::String, Type::String)
            | (Type::Bool, Type::Bool)
            | (Type::Nil, Type::Nil)
            | (Type::Any, Type::Any) => true,
            (Type::Array(a), Type::Array(b)) => a.equal(b),
            (Type::Function { params: p1, result: r1 }, Type::Function { params: p2, result: r2 }) => {
                p1.len() == p2.len()
                    && p1.iter().zip(p2.iter()).all(|(a, b)| a.equal(b))
                    && r1.equal(r2)
            }
            (Type::Union(a), Type::Union(b)) => {
                a.len() == b.len() && a.iter().all(|t| b.iter().any(|u| t.equal(u)))
            }
            (Type::Object { properties: a }, Type::Object { properties: b }) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(name, ty)| b.iter().any(|(n2, t2)| n2 == name && ty.equal(t2)))
            }
            _ => false,
        }
    }

    /// `is_assignable(from, to)` per spec invariant I2.
    pub fn is_assignable(from: &Type, to: &Type) -> bool {
        if matches!(to, Type::Any) {
            return true;
        }
        if from.equal(to) {
            return true;
        }
        if matches!(from, Type::Int) && matches!(to, Type::Float) {
            return true;
        }
        if matches!(from, Type::Nil) && matches!(to, Type::Array(_) | Type::Function { .. } | Type::Object { .. }) {
            return true;
        }
        if let Type::Union(members) = to {
            return members.iter().any(|t| Type::is_assignable(from, t));
        }
        if let Type::Union(members) = from {
            return members.iter().all(|t| Type::is_assignable(t, to));
        }
        false
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Nil => write!(f, "nil"),
            Type::Any => write!(f, "any"),
            Type::Array(element) => write!(f, "Array<{}>", element),
            Type::Function { params, result } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", result)
            }
            Type::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", m)?;
                }
                Ok(())
            }
            Type::Object { properties } => {
                write!(f, "{{")?;
                for (i, (name, ty)) in properties.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_is_reflexive() {
        let types = [
            Type::Int,
            Type::Float,
            Type::String,
            Type::Bool,
            Type::Nil,
            Type::Any,
            Type::array(Type::Int),
            Type::Union(vec![Type::Int, Type::String]),
        ];
        for t in &types {
            assert!(t.equal(t));
        }
    }

    #[test]
    fn is_assignable_reflexive_p3() {
        let types = [Type::Int, Type::Float, Type::String, Type::Bool, Type::Nil, Type::Any];
        for t in &types {
            assert!(Type::is_assignable(t, t));
        }
    }

    #[test]
    fn everything_assignable_to_any_p4() {
        let types = [Type::Int, Type::Float, Type::String, Type::Bool, Type::Nil, Type::array(Type::Int)];
        for t in &types {
            assert!(Type::is_assignable(t, &Type::Any));
        }
    }

    #[test]
    fn int_is_assignable_to_float() {
        assert!(Type::is_assignable(&Type::Int, &Type::Float));
        assert!(!Type::is_assignable(&Type::Float, &Type::Int));
    }

    #[test]
    fn nil_is_assignable_to_array_function_object_not_int() {
        assert!(Type::is_assignable(&Type::Nil, &Type::array(Type::Int)));
        assert!(Type::is_assignable(&Type::Nil, &Type::function(vec![], Type::Int)));
        assert!(!Type::is_assignable(&Type::Nil, &Type::Int));
    }

    #[test]
    fn union_assignability() {
        let u = Type::Union(vec![Type::Int, Type::String]);
        assert!(Type::is_assignable(&Type::Int, &u));
        assert!(Type::is_assignable(&Type::String, &u));
        assert!(!Type::is_assignable(&Type::Bool, &u));
        // a union is assignable to `to` only if every member is
        assert!(Type::is_assignable(&u, &Type::Any));
        assert!(!Type::is_assignable(&u, &Type::Int));
    }

    #[test]
    fn string_not_assignable_to_int() {
        assert!(!Type::is_assignable(&Type::String, &Type::Int));
    }
}
