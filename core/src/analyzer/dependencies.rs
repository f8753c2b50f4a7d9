//! Free-identifier analysis.

use std::collections::BTreeSet;

use crate::STDLIB_ROOT;
use crate::parser::Expr;

/// Names `expr` reads from its environment.
///
/// The library root is never a dependency, and names bound by an enclosing
/// function literal are subtracted inside that literal's body.
pub fn free_identifiers(expr: &Expr) -> BTreeSet<String> {
    let mut free = BTreeSet::new();
    let mut bound: Vec<&str> = Vec::new();
    collect(expr, &mut bound, &mut free);
    free
}

fn collect<'e>(expr: &'e Expr, bound: &mut Vec<&'e str>, free: &mut BTreeSet<String>) {
    match expr {
        Expr::Number(_) | Expr::String(_) | Expr::Boolean(_) => {}
        Expr::Ident(name) => {
            if name != STDLIB_ROOT && !bound.contains(&name.as_str()) {
                free.insert(name.clone());
            }
        }
        Expr::Unary { operand, .. } => collect(operand, bound, free),
        Expr::Binary { left, right, .. } => {
            collect(left, bound, free);
            collect(right, bound, free);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            collect(test, bound, free);
            collect(consequent, bound, free);
            collect(alternate, bound, free);
        }
        // The property is a name, not a read.
        Expr::Member { object, .. } => collect(object, bound, free),
        Expr::Call { callee, args } => {
            collect(callee, bound, free);
            args.iter().for_each(|arg| collect(arg, bound, free));
        }
        Expr::Function { params, body } => {
            let mark = bound.len();
            bound.extend(params.iter().map(String::as_str));
            collect(body, bound, free);
            bound.truncate(mark);
        }
        Expr::Object(fields) => fields
            .iter()
            .for_each(|(_, value)| collect(value, bound, free)),
    }
}
