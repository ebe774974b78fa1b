//! Pipeline executor
//!
//! A pipeline threads one [`Value`] through its stages, starting from the
//! input collection. Most stages need a collection; a stage that receives a
//! scalar from the previous stage fails with an execution error.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::collection::{Collection, Key, SortFlags, Value};
use crate::engine::conditions::{evaluate, resolve_field};
use crate::error::{KollectError, Result};
use crate::output::{ConsoleDumper, Dumper, JsonOptions, OutputFormat};
use crate::parser::{normalize_name, Arg, ConditionExpr, Pipeline, Stage};

/// Execution context containing runtime configuration
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub output_format: OutputFormat,
    pub pretty: bool,
    pub verbose: bool,
    /// Seed for `random` and `shuffle`; a fresh seed per run when unset
    pub seed: Option<u64>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Human,
            pretty: false,
            verbose: false,
            seed: None,
        }
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub data: ResultData,
    pub message: Option<String>,
}

impl ExecutionResult {
    pub fn value(value: Value) -> Self {
        Self {
            data: ResultData::Value(value),
            message: None,
        }
    }

    pub fn explanation(lines: Vec<String>) -> Self {
        Self {
            data: ResultData::Explanation(lines),
            message: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResultData {
    Value(Value),
    Explanation(Vec<String>),
}

// ============================================================================
// Stage table
// ============================================================================

/// A pipeline stage known to the executor
#[derive(Debug, Clone, Copy)]
pub struct StageInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

macro_rules! stages {
    ($($name:literal, $usage:literal, $summary:literal;)+) => {
        &[$(StageInfo { name: $name, usage: $usage, summary: $summary }),+]
    };
}

pub const STAGES: &[StageInfo] = stages! {
    "all", "all", "Return the collection unchanged";
    "count", "count", "Number of entries";
    "is_empty", "is_empty", "True when there are no entries";
    "is_not_empty", "is_not_empty", "True when there is at least one entry";
    "keys", "keys", "Sequence of the keys";
    "values", "values", "Sequence of the values, renumbered";
    "first", "first(cond?)", "First value, or the first one matching";
    "last", "last(cond?)", "Last value, or the last one matching";
    "get", "get(key, default?)", "Value at a key";
    "has", "has(key)", "True when the key exists";
    "search", "search(key)", "Same as has";
    "only", "only(keys...)", "Keep only the listed keys";
    "except", "except(keys...)", "Remove keys, dotted paths reach into nested collections";
    "forget", "forget(keys...)", "Remove top-level keys";
    "pull", "pull(key)", "Remove a key and continue with its value";
    "random", "random", "A uniformly chosen value";
    "map", "map(expr)", "Replace each value, keys kept";
    "transform", "transform(expr)", "Replace each value in place";
    "map_with_keys", "map_with_keys(key_field, expr?)", "Re-key each entry by a field";
    "flat_map", "flat_map(expr)", "Map, then collapse one level";
    "every", "every(cond)", "True when every entry matches";
    "filter", "filter(cond?)", "Keep matching entries, keys kept";
    "chunk", "chunk(size)", "Groups of at most size entries";
    "split", "split(groups)", "At most the given number of groups";
    "collapse", "collapse", "Merge nested collections one level";
    "flatten", "flatten(depth?)", "Flatten nested collections into one sequence";
    "group_by", "group_by(field)", "Group records by a field";
    "key_by", "key_by(field)", "Key records by a field";
    "partition", "partition(cond)", "Split into [matching, rest]";
    "pluck", "pluck(field)", "Extract a field from each record";
    "cross_join", "cross_join(lists...)", "Cartesian product of the lists";
    "cross_joins", "cross_joins(lists...)", "Cartesian product of the collection and the lists";
    "implode", "implode(field?, glue)", "Join values into a string";
    "nth", "nth(step, offset?)", "Every step-th entry";
    "flip", "flip", "Swap keys and values";
    "slice", "slice(offset, length?)", "Entries from an offset, keys kept";
    "take", "take(limit)", "First entries, or last ones for a negative limit";
    "for_page", "for_page(page, per_page)", "One page of entries";
    "union", "union(other)", "Add entries whose keys are new";
    "merge", "merge(other)", "Append lists, overwrite named keys";
    "diff", "diff(other)", "Entries whose values are not in other";
    "diff_assoc", "diff_assoc(other)", "Entries whose key and value pair is not in other";
    "diff_keys", "diff_keys(other)", "Entries whose keys are not in other";
    "intersect", "intersect(other)", "Entries whose values are in other";
    "intersect_by_keys", "intersect_by_keys(other)", "Entries whose keys are in other";
    "combine", "combine(values)", "Use the values as keys for another list";
    "concat", "concat(list)", "Append values, renumbered";
    "unique", "unique", "Drop repeated values";
    "prepend", "prepend(key, value)", "Insert an entry at the front";
    "push", "push(value)", "Append under the next integer key";
    "put", "put(key, value)", "Set a key";
    "pop", "pop", "Continue with the last value";
    "shift", "shift", "Continue with the first value";
    "sum", "sum(field?)", "Numeric sum";
    "avg", "avg(field?)", "Arithmetic mean";
    "median", "median(field?)", "Median value";
    "mode", "mode(field?)", "Most frequent value";
    "min", "min(field?)", "Smallest value";
    "max", "max(field?)", "Largest value";
    "sort", "sort", "Sort values ascending, keys kept";
    "sort_desc", "sort_desc", "Sort values descending, keys kept";
    "sort_by", "sort_by(expr, flags?)", "Sort by a computed key";
    "sort_by_desc", "sort_by_desc(expr, flags?)", "Sort by a computed key, descending";
    "reverse", "reverse", "Reverse entry order";
    "shuffle", "shuffle", "Randomly permute entries";
    "times", "times(n)", "Replace the input with the sequence 1..=n";
    "to_json", "to_json(pretty?)", "Encode as a JSON string";
    "dump", "dump(plain?)", "Print the collection to stderr";
    "dd", "dd(plain?)", "Print the collection and stop the pipeline";
};

/// Look a stage up by name, ignoring case and underscores
pub fn lookup_stage(name: &str) -> Option<&'static StageInfo> {
    let wanted = normalize_name(name);
    STAGES.iter().find(|info| normalize_name(info.name) == wanted)
}

// ============================================================================
// Execution
// ============================================================================

struct Runtime {
    rng: StdRng,
    dumper: ConsoleDumper,
}

/// Run every stage of `pipeline` over `input`
pub fn execute_pipeline(
    pipeline: &Pipeline,
    input: Collection,
    ctx: &ExecutionContext,
) -> Result<ExecutionResult> {
    let rng = match ctx.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut runtime = Runtime {
        rng,
        dumper: ConsoleDumper::new(),
    };

    let mut current = Value::Collection(input);
    let mut message = None;

    for (index, stage) in pipeline.stages.iter().enumerate() {
        debug!(index, stage = %stage, "executing stage");
        current = apply_stage(stage, current, &mut runtime)?;

        if runtime.dumper.is_halted() {
            debug!(index, stage = %stage, "pipeline halted");
            message = Some(format!("Halted at stage {} ({})", index + 1, stage.name));
            break;
        }
    }

    Ok(ExecutionResult {
        data: ResultData::Value(current),
        message,
    })
}

/// Describe each stage without running anything
pub fn explain_pipeline(pipeline: &Pipeline) -> Result<ExecutionResult> {
    let mut lines = Vec::with_capacity(pipeline.stages.len());
    for (index, stage) in pipeline.stages.iter().enumerate() {
        let info = lookup_stage(&stage.name)
            .ok_or_else(|| KollectError::UnknownStage(stage.name.clone()))?;
        lines.push(format!("{}. {} - {}", index + 1, stage, info.summary));
    }
    Ok(ExecutionResult::explanation(lines))
}

fn apply_stage(stage: &Stage, current: Value, rt: &mut Runtime) -> Result<Value> {
    let name = stage.normalized_name();
    let args = StageArgs { stage };

    if name == "times" {
        return Ok(Collection::times(args.int(0)?).into());
    }

    let mut c = expect_collection(current, stage)?;

    let value: Value = match name.as_str() {
        "all" => c.into(),
        "count" => c.count().into(),
        "isempty" => c.is_empty().into(),
        "isnotempty" => c.is_not_empty().into(),
        "keys" => c.keys().into(),
        "values" => c.values().into(),
        "first" => match args.opt_selector(0) {
            Some(sel) => c.filter(|v, k| sel.test(v, k)).first().cloned().into(),
            None => c.first().cloned().into(),
        },
        "last" => match args.opt_selector(0) {
            Some(sel) => c.filter(|v, k| sel.test(v, k)).last().cloned().into(),
            None => c.last().cloned().into(),
        },
        "get" => {
            let default = args.opt_value(1).unwrap_or_default();
            c.get_or(args.key(0)?, default)
        }
        "has" => c.has(args.key(0)?).into(),
        "search" => c.search(args.key(0)?).into(),
        "only" => c.only(args.keys()?).into(),
        "except" => {
            c.except(args.keys()?)?;
            c.into()
        }
        "forget" => {
            c.forget(args.keys()?);
            c.into()
        }
        "pull" => c.pull(args.key(0)?).unwrap_or_default(),
        "random" => c.random(&mut rt.rng).cloned().unwrap_or_default(),

        // Transformation
        "map" => {
            let sel = args.selector(0)?;
            c.map(|v, k| sel.select(v, k)).into()
        }
        "transform" => {
            let sel = args.selector(0)?;
            c.transform(|v, k| sel.select(v, k));
            c.into()
        }
        "mapwithkeys" => {
            let key_field = args.field(0)?;
            let sel = args.opt_selector(1).unwrap_or(Selector::Field("_"));
            c.map_with_keys(|v, k| {
                resolve_field(v, k, key_field)
                    .as_ref()
                    .and_then(Key::from_value)
                    .map(|new_key| (new_key, sel.select(v, k)))
            })
            .into()
        }
        "flatmap" => {
            let sel = args.selector(0)?;
            c.flat_map(|v, k| sel.select(v, k)).into()
        }
        "every" => {
            let sel = args.selector(0)?;
            c.every(|v, k| sel.test(v, k)).into()
        }
        "filter" => match args.opt_selector(0) {
            Some(sel) => c.filter(|v, k| sel.test(v, k)).into(),
            None => c.filter_truthy().into(),
        },

        // Reshaping
        "chunk" => c.chunk(args.usize(0)?).into(),
        "split" => c.split(args.usize(0)?).into(),
        "collapse" => c.collapse().into(),
        "flatten" => match args.opt_int(0)? {
            Some(depth) => c.flatten_depth(non_negative(depth, stage)?).into(),
            None => c.flatten().into(),
        },
        "groupby" => c.group_by(args.key(0)?).into(),
        "keyby" => c.key_by(args.key(0)?).into(),
        "partition" => {
            let sel = args.selector(0)?;
            c.partition(|v, k| sel.test(v, k)).into()
        }
        "pluck" => column(&c, args.field(0)?).into(),
        "crossjoin" => c.cross_join(&args.collections()?).into(),
        "crossjoins" => c.cross_joins(&args.collections()?).into(),
        "implode" => match args.opt_text(1)? {
            Some(glue) => c.implode(args.field(0)?, Some(glue)).into(),
            None => c.implode(args.opt_text(0)?.unwrap_or(""), None).into(),
        },
        "nth" => {
            let offset = match args.opt_int(1)? {
                Some(offset) => non_negative(offset, stage)?,
                None => 0,
            };
            c.nth(args.usize(0)?, offset)?.into()
        }
        "flip" => c.flip().into(),
        "slice" => c.slice(args.int(0)?, args.opt_int(1)?).into(),
        "take" => c.take(args.int(0)?).into(),
        "forpage" => c.for_page(args.int(0)?, args.int(1)?).into(),

        // Set algebra and sequence editing
        "union" => c.union(&args.collection(0)?).into(),
        "merge" => c.merge(&args.collection(0)?).into(),
        "diff" => c.diff(&args.collection(0)?).into(),
        "diffassoc" => c.diff_assoc(&args.collection(0)?).into(),
        "diffkeys" => c.diff_keys(&args.collection(0)?).into(),
        "intersect" => c.intersect(&args.collection(0)?).into(),
        "intersectbykeys" => c.intersect_by_keys(&args.collection(0)?).into(),
        "combine" => c.combine(&args.collection(0)?)?.into(),
        "concat" => c.concat(&args.collection(0)?).into(),
        "unique" => c.unique().into(),
        "prepend" => c.prepend(args.key(0)?, args.value(1)?).into(),
        "push" => {
            c.push(args.value(0)?);
            c.into()
        }
        "put" => {
            c.put(args.key(0)?, args.value(1)?);
            c.into()
        }
        "pop" => c.pop().unwrap_or_default(),
        "shift" => c.shift().unwrap_or_default(),

        // Aggregation and ordering
        "sum" => source(&c, &args)?.sum(),
        "avg" => source(&c, &args)?.avg().unwrap_or_default(),
        "median" => source(&c, &args)?.median().unwrap_or_default(),
        "mode" => source(&c, &args)?.mode().unwrap_or_default(),
        "min" => source(&c, &args)?.min().unwrap_or_default(),
        "max" => source(&c, &args)?.max().unwrap_or_default(),
        "sort" => c.sort().into(),
        "sortdesc" => c.sort_with(|a, b| b.compare(a)).into(),
        "sortby" | "sortbydesc" => {
            let sel = args.selector(0)?;
            let flags = match args.opt_text(1)? {
                Some(text) => parse_sort_flags(text)?,
                None => SortFlags::Regular,
            };
            c.sort_by(|v, k| sel.select(v, k), flags, name == "sortbydesc")
                .into()
        }
        "reverse" => c.reverse().into(),
        "shuffle" => {
            c.shuffle(&mut rt.rng);
            c.into()
        }

        // Export and debugging
        "tojson" => {
            let options = JsonOptions {
                pretty: args.opt_bool(0)?.unwrap_or(false),
            };
            c.to_json(options)?.into()
        }
        "dump" => {
            c.dump(Some(&rt.dumper as &dyn Dumper), args.opt_bool(0)?.unwrap_or(false));
            c.into()
        }
        "dd" => {
            c.dd(Some(&rt.dumper as &dyn Dumper), args.opt_bool(0)?.unwrap_or(false));
            c.into()
        }

        _ => return Err(KollectError::UnknownStage(stage.name.clone())),
    };

    Ok(value)
}

fn expect_collection(value: Value, stage: &Stage) -> Result<Collection> {
    match value {
        Value::Collection(c) => Ok(c),
        other => Err(KollectError::ExecutionError(format!(
            "stage `{}` needs a collection, got {}",
            stage.name, other
        ))),
    }
}

/// Values at `path` for every entry that has it
fn column(c: &Collection, path: &str) -> Collection {
    c.iter()
        .filter_map(|(k, v)| resolve_field(v, k, path))
        .collect()
}

/// The collection itself, or the column named by the first argument
fn source(c: &Collection, args: &StageArgs<'_>) -> Result<Collection> {
    match args.opt_text(0)? {
        Some(path) => Ok(column(c, path)),
        None => Ok(c.clone()),
    }
}

fn non_negative(n: i64, stage: &Stage) -> Result<usize> {
    usize::try_from(n).map_err(|_| {
        KollectError::InvalidArgument(format!("stage `{}` expects a non-negative number", stage.name))
    })
}

fn parse_sort_flags(text: &str) -> Result<SortFlags> {
    match normalize_name(text).as_str() {
        "regular" => Ok(SortFlags::Regular),
        "numeric" => Ok(SortFlags::Numeric),
        "string" => Ok(SortFlags::String),
        "stringci" | "caseinsensitive" => Ok(SortFlags::StringCaseInsensitive),
        "natural" => Ok(SortFlags::Natural),
        other => Err(KollectError::InvalidArgument(format!("Unknown sort flags: {}", other))),
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// Per-entry expression: a field path, a condition or a constant
#[derive(Clone, Copy)]
enum Selector<'a> {
    Field(&'a str),
    Condition(&'a ConditionExpr),
    Constant(&'a Value),
}

impl Selector<'_> {
    fn select(&self, value: &Value, key: &Key) -> Value {
        match self {
            Selector::Field(path) => resolve_field(value, key, path).unwrap_or_default(),
            Selector::Condition(expr) => Value::Bool(evaluate(expr, value, key)),
            Selector::Constant(constant) => (*constant).clone(),
        }
    }

    fn test(&self, value: &Value, key: &Key) -> bool {
        match self {
            Selector::Condition(expr) => evaluate(expr, value, key),
            _ => self.select(value, key).is_truthy(),
        }
    }
}

struct StageArgs<'a> {
    stage: &'a Stage,
}

impl<'a> StageArgs<'a> {
    fn get(&self, index: usize) -> Option<&'a Arg> {
        self.stage.args.get(index)
    }

    fn required(&self, index: usize) -> Result<&'a Arg> {
        self.get(index).ok_or_else(|| {
            KollectError::ExecutionError(format!(
                "stage `{}` expects argument {}",
                self.stage.name,
                index + 1
            ))
        })
    }

    fn invalid(&self, index: usize, expected: &str) -> KollectError {
        KollectError::InvalidArgument(format!(
            "stage `{}` expects {} as argument {}",
            self.stage.name,
            expected,
            index + 1
        ))
    }

    fn int(&self, index: usize) -> Result<i64> {
        let arg = self.required(index)?;
        match arg {
            Arg::Literal(Value::Int(n)) => Ok(*n),
            Arg::Literal(Value::Float(f)) if f.fract() == 0.0 => Ok(*f as i64),
            _ => Err(self.invalid(index, "an integer")),
        }
    }

    fn opt_int(&self, index: usize) -> Result<Option<i64>> {
        match self.get(index) {
            Some(_) => self.int(index).map(Some),
            None => Ok(None),
        }
    }

    fn usize(&self, index: usize) -> Result<usize> {
        let n = self.int(index)?;
        usize::try_from(n).map_err(|_| self.invalid(index, "a non-negative integer"))
    }

    fn opt_bool(&self, index: usize) -> Result<Option<bool>> {
        match self.get(index) {
            Some(Arg::Literal(Value::Bool(b))) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(index, "true or false")),
            None => Ok(None),
        }
    }

    /// Bare field names are accepted as text
    fn field(&self, index: usize) -> Result<&'a str> {
        match self.required(index)? {
            Arg::Field(name) => Ok(name),
            Arg::Literal(Value::Str(s)) => Ok(s),
            _ => Err(self.invalid(index, "a field name")),
        }
    }

    fn opt_text(&self, index: usize) -> Result<Option<&'a str>> {
        match self.get(index) {
            Some(_) => self.field(index).map(Some),
            None => Ok(None),
        }
    }

    fn key(&self, index: usize) -> Result<Key> {
        match self.required(index)? {
            Arg::Field(name) => Ok(Key::from(name.as_str())),
            Arg::Literal(value) => {
                Key::from_value(value).ok_or_else(|| self.invalid(index, "a key"))
            }
            Arg::Condition(_) => Err(self.invalid(index, "a key")),
        }
    }

    /// All arguments as keys; a single list argument is spread
    fn keys(&self) -> Result<Vec<Key>> {
        if let [Arg::Literal(Value::Collection(list))] = self.stage.args.as_slice() {
            return list
                .iter()
                .map(|(_, v)| Key::from_value(v).ok_or_else(|| self.invalid(0, "a list of keys")))
                .collect();
        }
        (0..self.stage.args.len()).map(|i| self.key(i)).collect()
    }

    /// Literal value; bare words are read as strings
    fn value(&self, index: usize) -> Result<Value> {
        match self.required(index)? {
            Arg::Literal(value) => Ok(value.clone()),
            Arg::Field(name) => Ok(Value::from(name.as_str())),
            Arg::Condition(_) => Err(self.invalid(index, "a value")),
        }
    }

    fn opt_value(&self, index: usize) -> Option<Value> {
        self.value(index).ok()
    }

    fn collection(&self, index: usize) -> Result<Collection> {
        match self.required(index)? {
            Arg::Literal(Value::Collection(c)) => Ok(c.clone()),
            _ => Err(self.invalid(index, "a list or object")),
        }
    }

    fn collections(&self) -> Result<Vec<Collection>> {
        (0..self.stage.args.len()).map(|i| self.collection(i)).collect()
    }

    fn selector(&self, index: usize) -> Result<Selector<'a>> {
        Ok(match self.required(index)? {
            Arg::Field(path) => Selector::Field(path),
            Arg::Condition(expr) => Selector::Condition(expr),
            Arg::Literal(value) => Selector::Constant(value),
        })
    }

    fn opt_selector(&self, index: usize) -> Option<Selector<'a>> {
        self.selector(index).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_pipeline;

    fn run(pipeline: &str, input: Collection) -> Result<Value> {
        let pipeline = parse_pipeline(pipeline)?;
        let ctx = ExecutionContext {
            seed: Some(7),
            ..ExecutionContext::default()
        };
        match execute_pipeline(&pipeline, input, &ctx)?.data {
            ResultData::Value(value) => Ok(value),
            ResultData::Explanation(_) => panic!("Expected a value"),
        }
    }

    fn people() -> Collection {
        collection![
            collection!{"name" => "ada", "age" => 36, "team" => "core"},
            collection!{"name" => "bob", "age" => 17, "team" => "web"},
            collection!{"name" => "cy", "age" => 52, "team" => "core"}
        ]
    }

    #[test]
    fn test_filter_sort_pluck() {
        let result = run("filter(age >= 18) | sortByDesc(age) | pluck(name)", people()).unwrap();
        assert_eq!(result, Value::from(collection!["cy", "ada"]));
    }

    #[test]
    fn test_filter_keeps_keys() {
        let result = run("filter(team = 'core') | keys", people()).unwrap();
        assert_eq!(result, Value::from(collection![0, 2]));
    }

    #[test]
    fn test_aggregates_by_field() {
        assert_eq!(run("sum(age)", people()).unwrap(), Value::Int(105));
        assert_eq!(run("avg(age)", people()).unwrap(), Value::Int(35));
        assert_eq!(run("max(age)", people()).unwrap(), Value::Int(52));
        assert_eq!(run("pluck(age) | median", people()).unwrap(), Value::Int(36));
        assert_eq!(run("avg", Collection::new()).unwrap(), Value::Null);
    }

    #[test]
    fn test_group_by_keys() {
        let result = run("groupBy(team) | keys", people()).unwrap();
        assert_eq!(result, Value::from(collection!["core", "web"]));
        let sizes = run("groupBy(team) | map(_) | first | count", people()).unwrap();
        assert_eq!(sizes, Value::Int(2));
    }

    #[test]
    fn test_scalar_stage_output_blocks_collection_stage() {
        let result = run("count | sort", people());
        assert!(matches!(result, Err(KollectError::ExecutionError(_))));
    }

    #[test]
    fn test_unknown_stage() {
        let result = run("frobnicate", people());
        assert!(matches!(result, Err(KollectError::UnknownStage(name)) if name == "frobnicate"));
    }

    #[test]
    fn test_missing_argument() {
        assert!(matches!(run("chunk", people()), Err(KollectError::ExecutionError(_))));
        assert!(matches!(run("chunk(-1)", people()), Err(KollectError::InvalidArgument(_))));
    }

    #[test]
    fn test_stage_names_are_normalized() {
        let a = run("sort_by_desc(age) | pluck(name)", people()).unwrap();
        let b = run("SortByDesc(age) | pluck(name)", people()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lookup_agrees_with_dispatch() {
        for stage in &parse_pipeline("SORT_BY_DESC(age) | forPage(1, 2) | Is_Empty").unwrap().stages {
            let info = lookup_stage(&stage.name).unwrap();
            assert_eq!(normalize_name(info.name), stage.normalized_name());
        }
        assert!(run("sortBy(name, String_CI)", people()).is_ok());
    }

    #[test]
    fn test_times_starts_fresh() {
        let result = run("times(4) | filter(_ > 2) | values", Collection::new()).unwrap();
        assert_eq!(result, Value::from(collection![3, 4]));
    }

    #[test]
    fn test_editing_stages() {
        let result = run("push(4) | put(name, 'x') | prepend(first, 0) | except(name)", collection![1]).unwrap();
        assert_eq!(result, Value::from(collection!{"first" => 0, 0 => 1, 1 => 4}));
        assert_eq!(run("shift", collection![5, 6]).unwrap(), Value::Int(5));
        assert_eq!(run("pop", collection![5, 6]).unwrap(), Value::Int(6));
    }

    #[test]
    fn test_set_stages() {
        let input = collection![1, 2, 3, 2];
        assert_eq!(run("diff([2])", input.clone()).unwrap(), Value::from(Collection::from_pairs([(0, 1), (2, 3)])));
        assert_eq!(run("unique | values", input.clone()).unwrap(), Value::from(collection![1, 2, 3]));
        assert_eq!(
            run("combine(['a', 'b', 'c', 'd'])", collection!["k1", "k2", "k3", "k4"]).unwrap(),
            Value::from(collection!{"k1" => "a", "k2" => "b", "k3" => "c", "k4" => "d"})
        );
        assert!(matches!(
            run("combine([1])", input),
            Err(KollectError::LengthMismatch { keys: 4, values: 1 })
        ));
    }

    #[test]
    fn test_cross_joins_chain() {
        let result = run("crossJoins([5, 6])", collection![collection![1, 2], collection![3, 4]]).unwrap();
        assert_eq!(
            result,
            Value::from(collection![
                collection![1, 2, 5],
                collection![1, 2, 6],
                collection![3, 4, 5],
                collection![3, 4, 6]
            ])
        );
    }

    #[test]
    fn test_implode_forms() {
        assert_eq!(run("implode(name, ', ')", people()).unwrap(), Value::from("ada, bob, cy"));
        assert_eq!(run("implode('-')", collection![1, 2, 3]).unwrap(), Value::from("1-2-3"));
    }

    #[test]
    fn test_map_with_keys_and_sort_flags() {
        let result = run("mapWithKeys(name, age) | sortBy(_, numeric) | keys", people()).unwrap();
        assert_eq!(result, Value::from(collection!["bob", "ada", "cy"]));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = run("shuffle", Collection::times(10)).unwrap();
        let b = run("shuffle", Collection::times(10)).unwrap();
        assert_eq!(a, b);
        assert_eq!(run("shuffle | sort | values", Collection::times(10)).unwrap(), Value::from(Collection::times(10)));
    }

    #[test]
    fn test_dd_halts_pipeline() {
        let pipeline = parse_pipeline("take(2) | dd | count").unwrap();
        let result = execute_pipeline(&pipeline, collection![1, 2, 3], &ExecutionContext::default()).unwrap();
        assert!(result.message.is_some());
        match result.data {
            ResultData::Value(value) => assert_eq!(value, Value::from(collection![1, 2])),
            ResultData::Explanation(_) => panic!("Expected a value"),
        }
    }

    #[test]
    fn test_to_json_stage() {
        let result = run("to_json", collection!{"a" => 1}).unwrap();
        assert_eq!(result, Value::from(r#"{"a":1}"#));
    }

    #[test]
    fn test_explain() {
        let pipeline = parse_pipeline("filter(age > 1) | pluck(name)").unwrap();
        let result = explain_pipeline(&pipeline).unwrap();
        match result.data {
            ResultData::Explanation(lines) => {
                assert_eq!(lines.len(), 2);
                assert!(lines[0].starts_with("1. filter(age > 1) - "));
                assert!(lines[1].starts_with("2. pluck(name) - "));
            }
            ResultData::Value(_) => panic!("Expected explanation"),
        }
        let unknown = parse_pipeline("nope").unwrap();
        assert!(matches!(explain_pipeline(&unknown), Err(KollectError::UnknownStage(_))));
    }

    #[test]
    fn test_every_table_entry_dispatches() {
        for info in STAGES {
            let pipeline = parse_pipeline(info.name).unwrap();
            let result = execute_pipeline(&pipeline, collection![1, 2], &ExecutionContext::default());
            assert!(
                !matches!(result, Err(KollectError::UnknownStage(_))),
                "stage {} is listed but not dispatched",
                info.name
            );
        }
    }
}
