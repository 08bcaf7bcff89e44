//! Operator and indexing semantics on evaluated operands.

use crate::RuntimeError;
use std::rc::Rc;
use webster_parser::lexer::Token;
use webster_value::Object;

/// Applies a prefix operator.
pub fn eval_unary(op: &Token, operand: Object) -> Result<Object, RuntimeError> {
    match (op, operand) {
        (Token::LogicalNot, operand) => Ok(Object::Boolean(!operand.is_truthy())),
        (Token::Minus, Object::Integer(val)) => Ok(Object::Integer(val.wrapping_neg())),
        (Token::Minus, Object::Float(val)) => Ok(Object::Float(-val)),
        (op, operand) => Err(RuntimeError::UnknownPrefixOperator {
            op: op.as_str().to_string(),
            operand: operand.type_name(),
        }),
    }
}

/// Applies a binary operator. `&&` and `||` short-circuit and never reach this function.
pub fn eval_binary(op: &Token, lhs: Object, rhs: Object) -> Result<Object, RuntimeError> {
    // Arithmetic and comparisons shared by integers and floats. `$arith` selects the
    // integer or float flavour of `+ - * /`.
    macro_rules! gen_num_binary_op {
        ($l: expr, $r: expr, $variant: path, $arith: ident) => {
            match op {
                Token::Plus | Token::Minus | Token::Asterisk | Token::Slash => {
                    $arith(op, $l, $r).map($variant)
                }
                Token::LessThan => Ok(Object::Boolean($l < $r)),
                Token::GreaterThan => Ok(Object::Boolean($l > $r)),
                Token::EqualsEquals => Ok(Object::Boolean($l == $r)),
                Token::NotEquals => Ok(Object::Boolean($l != $r)),
                _ => Err(unknown_infix(op, &lhs, &rhs)),
            }
        };
    }

    match (&lhs, &rhs) {
        (Object::Integer(l), Object::Integer(r)) => {
            gen_num_binary_op!(*l, *r, Object::Integer, int_arith)
        }
        (Object::Float(l), Object::Float(r)) => {
            gen_num_binary_op!(*l, *r, Object::Float, float_arith)
        }
        (Object::String(l), Object::String(r)) => match op {
            Token::Plus => Ok(Object::String(format!("{}{}", l, r))),
            Token::EqualsEquals => Ok(Object::Boolean(l == r)),
            Token::NotEquals => Ok(Object::Boolean(l != r)),
            _ => Err(unknown_infix(op, &lhs, &rhs)),
        },
        (Object::Array(l), Object::Array(r)) => match op {
            Token::Plus => {
                let mut elements = l.borrow().to_vec();
                elements.extend(r.borrow().iter().cloned());
                Ok(Object::new_array(elements))
            }
            Token::EqualsEquals => Ok(Object::Boolean(Rc::ptr_eq(l, r))),
            Token::NotEquals => Ok(Object::Boolean(!Rc::ptr_eq(l, r))),
            _ => Err(unknown_infix(op, &lhs, &rhs)),
        },
        _ => match op {
            Token::EqualsEquals => Ok(Object::Boolean(identical(&lhs, &rhs))),
            Token::NotEquals => Ok(Object::Boolean(!identical(&lhs, &rhs))),
            _ if lhs.type_name() != rhs.type_name() => Err(RuntimeError::TypeMismatch {
                lhs: lhs.type_name(),
                op: op.as_str().to_string(),
                rhs: rhs.type_name(),
            }),
            _ => Err(unknown_infix(op, &lhs, &rhs)),
        },
    }
}

fn int_arith(op: &Token, l: i64, r: i64) -> Result<i64, RuntimeError> {
    match op {
        Token::Plus => Ok(l.wrapping_add(r)),
        Token::Minus => Ok(l.wrapping_sub(r)),
        Token::Asterisk => Ok(l.wrapping_mul(r)),
        _ if r == 0 => Err(RuntimeError::DivisionByZero),
        _ => Ok(l.wrapping_div(r)),
    }
}

fn float_arith(op: &Token, l: f64, r: f64) -> Result<f64, RuntimeError> {
    Ok(match op {
        Token::Plus => l + r,
        Token::Minus => l - r,
        Token::Asterisk => l * r,
        _ => l / r,
    })
}

/// `==` for operand pairs without a value comparison: booleans and null by value,
/// containers and functions by identity, different types never.
fn identical(lhs: &Object, rhs: &Object) -> bool {
    match (lhs, rhs) {
        (Object::Boolean(l), Object::Boolean(r)) => l == r,
        (Object::Null, Object::Null) => true,
        (Object::Dictionary(l), Object::Dictionary(r)) => Rc::ptr_eq(l, r),
        (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
        _ => false,
    }
}

fn unknown_infix(op: &Token, lhs: &Object, rhs: &Object) -> RuntimeError {
    RuntimeError::UnknownInfixOperator {
        lhs: lhs.type_name(),
        op: op.as_str().to_string(),
        rhs: rhs.type_name(),
    }
}

/// `collection[index]`. Positions that are well typed but absent evaluate to `null`.
pub fn eval_index(collection: &Object, index: &Object) -> Result<Object, RuntimeError> {
    match (collection, index) {
        (Object::String(val), Object::Integer(idx)) => Ok(usize::try_from(*idx)
            .ok()
            .and_then(|idx| val.as_bytes().get(idx))
            .map(|byte| Object::String(char::from(*byte).to_string()))
            .unwrap_or(Object::Null)),
        (Object::Array(elements), Object::Integer(idx)) => Ok(usize::try_from(*idx)
            .ok()
            .and_then(|idx| elements.borrow().get(idx).cloned())
            .unwrap_or(Object::Null)),
        (Object::Dictionary(dict), key) => {
            Ok(dict.borrow().get(key)?.cloned().unwrap_or(Object::Null))
        }
        _ => Err(RuntimeError::IndexNotSupported {
            collection: collection.type_name(),
            index: index.type_name(),
        }),
    }
}

/// `collection[index] = value`. Mutates the shared container in place.
pub fn assign_index(collection: &Object, index: Object, value: Object) -> Result<(), RuntimeError> {
    match (collection, index) {
        (Object::Array(elements), Object::Integer(idx)) => {
            let mut elements = elements.borrow_mut();
            let len = elements.len();
            match usize::try_from(idx).ok().and_then(|idx| elements.get_mut(idx)) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(RuntimeError::IndexOutOfRange { index: idx, len }),
            }
        }
        (Object::Dictionary(dict), key) => dict
            .borrow_mut()
            .insert(key, value)
            .map_err(RuntimeError::from),
        (collection, index) => Err(RuntimeError::IndexNotSupported {
            collection: collection.type_name(),
            index: index.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webster_value::Dictionary;

    fn int(val: i64) -> Object {
        Object::Integer(val)
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval_unary(&Token::Minus, int(5)), Ok(int(-5)));
        assert_eq!(eval_unary(&Token::Minus, Object::Float(1.5)), Ok(Object::Float(-1.5)));
        assert_eq!(eval_unary(&Token::Minus, int(i64::MIN)), Ok(int(i64::MIN)));
        assert_eq!(eval_unary(&Token::LogicalNot, int(0)), Ok(Object::Boolean(false)));
        assert_eq!(eval_unary(&Token::LogicalNot, Object::Null), Ok(Object::Boolean(true)));
        assert_eq!(
            eval_unary(&Token::Minus, Object::Boolean(true)).unwrap_err().to_string(),
            "unknown operator: -BOOLEAN"
        );
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval_binary(&Token::Plus, int(2), int(3)), Ok(int(5)));
        assert_eq!(eval_binary(&Token::Minus, int(2), int(3)), Ok(int(-1)));
        assert_eq!(eval_binary(&Token::Asterisk, int(4), int(3)), Ok(int(12)));
        assert_eq!(eval_binary(&Token::Slash, int(7), int(2)), Ok(int(3)));
        assert_eq!(eval_binary(&Token::Plus, int(i64::MAX), int(1)), Ok(int(i64::MIN)));
        assert_eq!(eval_binary(&Token::Slash, int(i64::MIN), int(-1)), Ok(int(i64::MIN)));
        assert_eq!(
            eval_binary(&Token::Slash, int(1), int(0)),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(
            eval_binary(&Token::Plus, Object::Float(0.5), Object::Float(0.25)),
            Ok(Object::Float(0.75))
        );
        assert_eq!(
            eval_binary(&Token::Slash, Object::Float(1.0), Object::Float(0.0)),
            Ok(Object::Float(f64::INFINITY))
        );
        assert_eq!(
            eval_binary(&Token::LessThan, Object::Float(0.5), Object::Float(0.25)),
            Ok(Object::Boolean(false))
        );
    }

    #[test]
    fn test_no_numeric_promotion() {
        assert_eq!(
            eval_binary(&Token::Plus, int(1), Object::Float(1.0)).unwrap_err().to_string(),
            "type mismatch: INTEGER + FLOAT"
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval_binary(&Token::LessThan, int(1), int(2)), Ok(Object::Boolean(true)));
        assert_eq!(eval_binary(&Token::GreaterThan, int(1), int(2)), Ok(Object::Boolean(false)));
        assert_eq!(eval_binary(&Token::EqualsEquals, int(1), int(1)), Ok(Object::Boolean(true)));
        assert_eq!(
            eval_binary(&Token::NotEquals, Object::Null, Object::Null),
            Ok(Object::Boolean(false))
        );
        assert_eq!(
            eval_binary(&Token::EqualsEquals, int(1), Object::Boolean(true)),
            Ok(Object::Boolean(false))
        );
        assert_eq!(
            eval_binary(&Token::LessThan, Object::Boolean(true), Object::Boolean(false))
                .unwrap_err()
                .to_string(),
            "unknown operator: BOOLEAN < BOOLEAN"
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            eval_binary(&Token::Plus, "foo".into(), "bar".into()),
            Ok(Object::from("foobar"))
        );
        assert_eq!(
            eval_binary(&Token::EqualsEquals, "a".into(), "a".into()),
            Ok(Object::Boolean(true))
        );
        assert_eq!(
            eval_binary(&Token::Minus, "a".into(), "b".into()).unwrap_err().to_string(),
            "unknown operator: STRING - STRING"
        );
    }

    #[test]
    fn test_arrays() {
        let lhs = Object::new_array(vec![int(1)]);
        let rhs = Object::new_array(vec![int(2), int(3)]);
        let joined = eval_binary(&Token::Plus, lhs.clone(), rhs).unwrap();
        assert_eq!(joined.inspect(), "[1, 2, 3]");
        // the operands are left untouched
        assert_eq!(lhs.inspect(), "[1]");

        assert_eq!(
            eval_binary(&Token::EqualsEquals, lhs.clone(), lhs.clone()),
            Ok(Object::Boolean(true))
        );
        assert_eq!(
            eval_binary(&Token::EqualsEquals, lhs, Object::new_array(vec![int(1)])),
            Ok(Object::Boolean(false))
        );
    }

    #[test]
    fn test_index() {
        let array = Object::new_array(vec![int(1), int(2)]);
        assert_eq!(eval_index(&array, &int(1)), Ok(int(2)));
        assert_eq!(eval_index(&array, &int(2)), Ok(Object::Null));
        assert_eq!(eval_index(&array, &int(-1)), Ok(Object::Null));

        let string = Object::from("abc");
        assert_eq!(eval_index(&string, &int(0)), Ok(Object::from("a")));
        assert_eq!(eval_index(&string, &int(3)), Ok(Object::Null));

        let mut dict = Dictionary::new();
        dict.insert("a".into(), int(1)).unwrap();
        let dict = Object::new_dictionary(dict);
        assert_eq!(eval_index(&dict, &"a".into()), Ok(int(1)));
        assert_eq!(eval_index(&dict, &"b".into()), Ok(Object::Null));
        assert_eq!(
            eval_index(&dict, &array).unwrap_err().to_string(),
            "unusable as dictionary key: ARRAY"
        );

        assert_eq!(
            eval_index(&int(1), &int(0)).unwrap_err().to_string(),
            "index operator not supported: INTEGER[INTEGER]"
        );
        assert_eq!(
            eval_index(&array, &"a".into()).unwrap_err().to_string(),
            "index operator not supported: ARRAY[STRING]"
        );
    }

    #[test]
    fn test_assign_index() {
        let array = Object::new_array(vec![int(1), int(2)]);
        assign_index(&array, int(0), int(9)).unwrap();
        assert_eq!(array.inspect(), "[9, 2]");
        assert_eq!(
            assign_index(&array, int(2), int(0)),
            Err(RuntimeError::IndexOutOfRange { index: 2, len: 2 })
        );

        let dict = Object::new_dictionary(Dictionary::new());
        assign_index(&dict, "k".into(), int(1)).unwrap();
        assign_index(&dict, "k".into(), int(2)).unwrap();
        assert_eq!(eval_index(&dict, &"k".into()), Ok(int(2)));
        assert_eq!(
            assign_index(&dict, Object::Null, int(1)),
            Err(RuntimeError::UnusableAsKey("NULL"))
        );
    }
}
