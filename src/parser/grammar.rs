//! Pest grammar parser for the pipeline DSL

use pest::Parser;
use pest_derive::Parser;

use crate::collection::{Collection, Key, Value};
use crate::error::{KollectError, Result};
use crate::parser::ast::*;

#[derive(Parser)]
#[grammar = "../grammar/pipeline.pest"]
pub struct PipelineParser;

/// Parse a pipeline string into an AST
pub fn parse_pipeline(input: &str) -> Result<Pipeline> {
    let pair = PipelineParser::parse(Rule::pipeline, input)
        .map_err(|e| KollectError::ParseError(e.to_string()))?
        .next()
        .ok_or_else(|| KollectError::ParseError("Empty pipeline".to_string()))?;

    let mut stages = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::stage {
            stages.push(parse_stage(inner)?);
        }
    }

    Ok(Pipeline { stages })
}

fn parse_stage(pair: pest::iterators::Pair<Rule>) -> Result<Stage> {
    let mut inner = pair.into_inner();

    let name = inner
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected stage name".to_string()))?
        .as_str()
        .to_string();

    let mut args = Vec::new();
    if let Some(arg_list) = inner.next() {
        for arg in arg_list.into_inner() {
            args.push(parse_arg(arg)?);
        }
    }

    Ok(Stage { name, args })
}

fn parse_arg(pair: pest::iterators::Pair<Rule>) -> Result<Arg> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected argument".to_string()))?;

    match inner.as_rule() {
        Rule::condition_expr => Ok(Arg::Condition(parse_condition_expr(inner)?)),
        Rule::literal => Ok(Arg::Literal(parse_literal(inner)?)),
        Rule::field => Ok(Arg::Field(inner.as_str().to_string())),
        _ => Err(KollectError::ParseError(format!(
            "Unexpected rule in argument: {:?}",
            inner.as_rule()
        ))),
    }
}

// ============================================================================
// Conditions
// ============================================================================

fn parse_condition_expr(pair: pest::iterators::Pair<Rule>) -> Result<ConditionExpr> {
    let mut conditions = Vec::new();
    let mut operators = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::condition => conditions.push(parse_condition(inner)?),
            Rule::and_op => operators.push(LogicalOp::And),
            Rule::or_op => operators.push(LogicalOp::Or),
            _ => {}
        }
    }

    // Link right to left so each node owns the rest of the chain
    let mut next: Option<(LogicalOp, Box<ConditionExpr>)> = None;
    while let Some(condition) = conditions.pop() {
        let expr = ConditionExpr { condition, next };
        match operators.pop() {
            Some(op) if !conditions.is_empty() => next = Some((op, Box::new(expr))),
            _ => return Ok(expr),
        }
    }

    Err(KollectError::ParseError("Expected condition".to_string()))
}

fn parse_condition(pair: pest::iterators::Pair<Rule>) -> Result<Condition> {
    let mut inner = pair.into_inner();

    let field = inner
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected field in condition".to_string()))?
        .as_str()
        .to_string();

    let op_pair = inner
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected operator in condition".to_string()))?;
    let operator = parse_compare_op(op_pair.as_str())?;

    let value_pair = inner
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected value in condition".to_string()))?;
    let value = parse_literal(value_pair)?;

    Ok(Condition {
        field,
        operator,
        value,
    })
}

fn parse_compare_op(op: &str) -> Result<CompareOp> {
    match op.to_lowercase().as_str() {
        "=" | "==" => Ok(CompareOp::Equal),
        "!=" => Ok(CompareOp::NotEqual),
        ">" => Ok(CompareOp::GreaterThan),
        ">=" => Ok(CompareOp::GreaterThanOrEqual),
        "<" => Ok(CompareOp::LessThan),
        "<=" => Ok(CompareOp::LessThanOrEqual),
        "like" => Ok(CompareOp::Like),
        "contains" => Ok(CompareOp::Contains),
        "matches" => Ok(CompareOp::Matches),
        other => Err(KollectError::ParseError(format!("Unknown operator: {}", other))),
    }
}

// ============================================================================
// Literals
// ============================================================================

fn parse_literal(pair: pest::iterators::Pair<Rule>) -> Result<Value> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected value".to_string()))?;

    match inner.as_rule() {
        Rule::string => Ok(Value::Str(parse_string(inner)?)),
        Rule::number => parse_number(inner.as_str()),
        Rule::boolean => Ok(Value::Bool(inner.as_str() == "true")),
        Rule::null => Ok(Value::Null),
        Rule::array => {
            let mut items = Collection::new();
            for item in inner.into_inner() {
                items.push(parse_literal(item)?);
            }
            Ok(Value::Collection(items))
        }
        Rule::object => {
            let mut entries = Collection::new();
            for pair in inner.into_inner() {
                let mut parts = pair.into_inner();
                let key_pair = parts
                    .next()
                    .ok_or_else(|| KollectError::ParseError("Expected object key".to_string()))?;
                let key = match key_pair.as_rule() {
                    Rule::string => parse_string(key_pair)?,
                    _ => key_pair.as_str().to_string(),
                };
                let value_pair = parts
                    .next()
                    .ok_or_else(|| KollectError::ParseError("Expected object value".to_string()))?;
                entries.put(Key::from(key), parse_literal(value_pair)?);
            }
            Ok(Value::Collection(entries))
        }
        _ => Err(KollectError::ParseError("Invalid value type".to_string())),
    }
}

fn parse_number(text: &str) -> Result<Value> {
    if !text.contains(['.', 'e', 'E']) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Int(n));
        }
    }
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| KollectError::ParseError(format!("Invalid number: {}", text)))
}

fn parse_string(pair: pest::iterators::Pair<Rule>) -> Result<String> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| KollectError::ParseError("Expected string content".to_string()))?;

    match inner.as_rule() {
        Rule::dq_inner => Ok(unescape(inner.as_str())),
        _ => Ok(inner.as_str().to_string()),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_stage() {
        let pipeline = parse_pipeline("values").unwrap();
        assert_eq!(pipeline.stages.len(), 1);
        assert_eq!(pipeline.stages[0].name, "values");
        assert!(pipeline.stages[0].args.is_empty());
    }

    #[test]
    fn test_parse_chain_with_args() {
        let pipeline = parse_pipeline("chunk(2) | sortByDesc(user.age) | take(-3)").unwrap();
        let names: Vec<&str> = pipeline.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["chunk", "sortByDesc", "take"]);
        assert_eq!(pipeline.stages[0].args, vec![Arg::Literal(Value::Int(2))]);
        assert_eq!(pipeline.stages[1].args, vec![Arg::Field("user.age".to_string())]);
        assert_eq!(pipeline.stages[2].args, vec![Arg::Literal(Value::Int(-3))]);
    }

    #[test]
    fn test_parse_literals() {
        let pipeline =
            parse_pipeline(r#"f("a\"b", 'single', 1.5, true, null, [1, [2]], {x: 1, "y z": "w"})"#)
                .unwrap();
        let args = &pipeline.stages[0].args;
        assert_eq!(args[0], Arg::Literal(Value::from("a\"b")));
        assert_eq!(args[1], Arg::Literal(Value::from("single")));
        assert_eq!(args[2], Arg::Literal(Value::Float(1.5)));
        assert_eq!(args[3], Arg::Literal(Value::Bool(true)));
        assert_eq!(args[4], Arg::Literal(Value::Null));
        assert_eq!(
            args[5],
            Arg::Literal(Value::from(collection![1, collection![2]]))
        );
        assert_eq!(
            args[6],
            Arg::Literal(Value::from(collection!{"x" => 1, "y z" => "w"}))
        );
    }

    #[test]
    fn test_keyword_prefixed_field_is_a_field() {
        let pipeline = parse_pipeline("pluck(nullable) | pluck(trueName)").unwrap();
        assert_eq!(pipeline.stages[0].args, vec![Arg::Field("nullable".to_string())]);
        assert_eq!(pipeline.stages[1].args, vec![Arg::Field("trueName".to_string())]);
    }

    #[test]
    fn test_parse_condition_chain() {
        let pipeline = parse_pipeline(r#"filter(age >= 18 and name like "a%" or _key = 0)"#).unwrap();
        let expr = match &pipeline.stages[0].args[0] {
            Arg::Condition(expr) => expr,
            other => panic!("Expected condition, got {:?}", other),
        };
        let chain = expr.chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].0, None);
        assert_eq!(chain[0].1.field, "age");
        assert_eq!(chain[0].1.operator, CompareOp::GreaterThanOrEqual);
        assert_eq!(chain[1].0, Some(LogicalOp::And));
        assert_eq!(chain[1].1.operator, CompareOp::Like);
        assert_eq!(chain[2].0, Some(LogicalOp::Or));
        assert_eq!(chain[2].1.field, "_key");
        assert_eq!(
            expr.to_string(),
            r#"age >= 18 and name like "a%" or _key = 0"#
        );
    }

    #[test]
    fn test_parse_symbolic_operators() {
        let pipeline = parse_pipeline("filter(a == 1 && b != 2 || c matches 'x+')").unwrap();
        let Arg::Condition(expr) = &pipeline.stages[0].args[0] else {
            panic!("Expected condition");
        };
        let ops: Vec<Option<LogicalOp>> = expr.chain().iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec![None, Some(LogicalOp::And), Some(LogicalOp::Or)]);
        assert_eq!(expr.chain()[2].1.operator, CompareOp::Matches);
    }

    #[test]
    fn test_normalized_name() {
        let pipeline = parse_pipeline("sort_by_desc(x) | SortByDesc(x)").unwrap();
        assert_eq!(pipeline.stages[0].normalized_name(), "sortbydesc");
        assert_eq!(pipeline.stages[1].normalized_name(), "sortbydesc");
    }

    #[test]
    fn test_stage_display() {
        let pipeline = parse_pipeline(r#"implode(name, ", ") | count"#).unwrap();
        assert_eq!(pipeline.stages[0].to_string(), r#"implode(name, ", ")"#);
        assert_eq!(pipeline.stages[1].to_string(), "count");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_pipeline(""), Err(KollectError::ParseError(_))));
        assert!(matches!(parse_pipeline("take(1"), Err(KollectError::ParseError(_))));
        assert!(matches!(parse_pipeline("a | | b"), Err(KollectError::ParseError(_))));
    }
}
