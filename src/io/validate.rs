//! Config validation: raw JSON mapping -> fully-resolved next state.
//!
//! Every known key is coerced independently. A value that cannot be coerced,
//! is non-finite, or falls outside its range is dropped and the current value
//! is kept, so the result always satisfies the range table. Unknown keys are
//! ignored and missing keys keep their current values.
//!
//! The only hard failure is a document that is not a key/value mapping at all.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::{
    BiasMode, CurveId, ParamRange, ParameterSet, Side, Toggle, ToggleSet, XRange, ranges,
};
use crate::error::AppError;
use crate::store::{ParameterStore, RolloverOutcome};

/// Key names for one curve group.
struct CurveKeys {
    threshold: &'static str,
    constant: &'static str,
    bias: &'static str,
    bias_base: &'static str,
    auto_rollover: &'static str,
    bias_add_option: &'static str,
    /// Entry price of the position that tracks this curve's threshold.
    entry_price: &'static str,
}

const CURVE1_KEYS: CurveKeys = CurveKeys {
    threshold: "x0_1",
    constant: "constant1",
    bias: "b1",
    bias_base: "b1Base",
    auto_rollover: "autoRolloverB1",
    bias_add_option: "b1_add_option",
    entry_price: "longEntryPrice",
};

const CURVE2_KEYS: CurveKeys = CurveKeys {
    threshold: "x0_2",
    constant: "constant2",
    bias: "b2",
    bias_base: "b2Base",
    auto_rollover: "autoRolloverB2",
    bias_add_option: "b2_add_option",
    entry_price: "shortEntryPrice",
};

const OTHER_KEYS: [&str; 15] = [
    "anchor",
    "refConst",
    "callContracts",
    "premiumCall",
    "putContracts",
    "premiumPut",
    "longShares",
    "shortShares",
    "delta1",
    "delta2",
    "includePremium",
    "biasMode",
    "x1Range",
    "schemaVersion",
    "exportedAt",
];

/// The validated next state, ready to be applied in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPatch {
    pub params: ParameterSet,
    pub toggles: ToggleSet,
    /// Keys that were present but rejected (value kept from current state).
    pub rejected: Vec<String>,
}

/// Coerce a raw config document against the current state.
pub fn validate(
    raw: &Value,
    current: &ParameterSet,
    current_toggles: &ToggleSet,
) -> Result<ParameterPatch, AppError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| AppError::import(format!("expected a JSON object, got {}", json_kind(raw))))?;

    let mut r = Reader {
        obj,
        rejected: Vec::new(),
    };
    let mut next = current.clone();

    for (id, keys) in [(CurveId::One, &CURVE1_KEYS), (CurveId::Two, &CURVE2_KEYS)] {
        read_curve(&mut r, &mut next, current, id, keys);
    }

    next.benchmark.anchor = r.number("anchor", ranges::ANCHOR, current.benchmark.anchor);
    next.benchmark.ref_const = r.number("refConst", ranges::CONSTANT, current.benchmark.ref_const);

    next.call.contracts =
        r.integer("callContracts", ranges::CONTRACTS, current.call.contracts as f64) as u32;
    next.call.premium = r.number("premiumCall", ranges::PREMIUM, current.call.premium);
    next.put.contracts =
        r.integer("putContracts", ranges::CONTRACTS, current.put.contracts as f64) as u32;
    next.put.premium = r.number("premiumPut", ranges::PREMIUM, current.put.premium);

    next.long.shares = r.integer("longShares", ranges::SHARES, current.long.shares as f64) as u64;
    next.short.shares = r.integer("shortShares", ranges::SHARES, current.short.shares as f64) as u64;

    next.delta1 = r.number("delta1", ranges::DELTA, current.delta1);
    next.delta2 = r.number("delta2", ranges::DELTA, current.delta2);
    next.include_premium = r.boolean("includePremium", current.include_premium);
    next.bias_mode = r.bias_mode("biasMode", current.bias_mode);
    next.x_range = r.x_range("x1Range", current.x_range);

    let mut toggles = *current_toggles;
    for t in Toggle::ALL {
        toggles.set(t, r.boolean(t.key(), current_toggles.is_on(t)));
    }

    for key in obj.keys().filter(|k| !is_known_key(k)) {
        debug!(key = key.as_str(), "ignoring unknown config key");
    }

    Ok(ParameterPatch {
        params: next,
        toggles,
        rejected: r.rejected,
    })
}

/// Validate and apply in one step: the store is either untouched (error) or
/// fully updated and synchronized.
pub fn import_into(
    store: &mut ParameterStore,
    toggles: &mut ToggleSet,
    raw: &Value,
) -> Result<[RolloverOutcome; 2], AppError> {
    let patch = validate(raw, store.params(), toggles)?;
    if !patch.rejected.is_empty() {
        info!(rejected = ?patch.rejected, "config values rejected; kept current values");
    }
    *toggles = patch.toggles;
    Ok(store.replace(patch.params))
}

fn read_curve(
    r: &mut Reader<'_>,
    next: &mut ParameterSet,
    current: &ParameterSet,
    id: CurveId,
    keys: &CurveKeys,
) {
    let cur = *current.curve(id);
    let side = match id {
        CurveId::One => Side::Long,
        CurveId::Two => Side::Short,
    };

    let threshold = r.number(keys.threshold, ranges::THRESHOLD, cur.threshold);
    let constant = r.number(keys.constant, ranges::CONSTANT, cur.constant);
    let bias = r.number(keys.bias, ranges::BIAS, cur.bias);
    let auto_rollover = r.boolean(keys.auto_rollover, cur.auto_rollover);
    let bias_add_option = r.number(keys.bias_add_option, ranges::BIAS, cur.bias_add_option);

    // An explicit baseline wins. Otherwise mirror the setter rules: a manual
    // bias edit (rollover off) or a fresh rollover enable both capture the bias.
    let bias_base = if r.has(keys.bias_base) {
        r.number(keys.bias_base, ranges::BIAS, cur.bias_base)
    } else if (!auto_rollover && bias != cur.bias) || (auto_rollover && !cur.auto_rollover) {
        bias
    } else {
        cur.bias_base
    };

    // Same for the tracking entry price: explicit key wins, else it follows
    // a moved threshold.
    let cur_entry = current.position(side).entry_price;
    let entry_price = if r.has(keys.entry_price) {
        r.number(keys.entry_price, ranges::ENTRY_PRICE, cur_entry)
    } else if threshold != cur.threshold {
        ranges::ENTRY_PRICE.clamp(threshold)
    } else {
        cur_entry
    };

    let c = next.curve_mut(id);
    c.threshold = threshold;
    c.constant = constant;
    c.bias = bias;
    c.bias_base = bias_base;
    c.auto_rollover = auto_rollover;
    c.bias_add_option = bias_add_option;
    next.position_mut(side).entry_price = entry_price;
}

struct Reader<'a> {
    obj: &'a Map<String, Value>,
    rejected: Vec<String>,
}

impl Reader<'_> {
    fn has(&self, key: &str) -> bool {
        self.obj.contains_key(key)
    }

    fn reject(&mut self, key: &str, value: &Value) {
        debug!(key, value = %value, "config value rejected");
        self.rejected.push(key.to_string());
    }

    fn number(&mut self, key: &str, range: ParamRange, current: f64) -> f64 {
        self.checked(key, range, current, |v| v)
    }

    /// Like [`Reader::number`], rounding before the range check.
    fn integer(&mut self, key: &str, range: ParamRange, current: f64) -> f64 {
        self.checked(key, range, current, f64::round)
    }

    fn checked(
        &mut self,
        key: &str,
        range: ParamRange,
        current: f64,
        shape: impl Fn(f64) -> f64,
    ) -> f64 {
        let Some(raw) = self.obj.get(key) else {
            return current;
        };
        match coerce_number(raw).map(shape) {
            Some(v) if range.contains(v) => v,
            _ => {
                self.reject(key, raw);
                current
            }
        }
    }

    fn boolean(&mut self, key: &str, current: bool) -> bool {
        let Some(raw) = self.obj.get(key) else {
            return current;
        };
        coerce_bool(raw).unwrap_or_else(|| {
            self.reject(key, raw);
            current
        })
    }

    fn bias_mode(&mut self, key: &str, current: BiasMode) -> BiasMode {
        let Some(raw) = self.obj.get(key) else {
            return current;
        };
        match raw.as_str().and_then(BiasMode::parse_exact) {
            Some(mode) => mode,
            None => {
                self.reject(key, raw);
                current
            }
        }
    }

    /// The pair is validated as a unit: each endpoint is coerced (falling back
    /// to the current endpoint), then clamped, reordered, and widened.
    fn x_range(&mut self, key: &str, current: XRange) -> XRange {
        let Some(raw) = self.obj.get(key) else {
            return current;
        };
        let Some([a, b]) = raw.as_array().and_then(|arr| <&[Value; 2]>::try_from(arr.as_slice()).ok())
        else {
            self.reject(key, raw);
            return current;
        };
        let lo = coerce_number(a).unwrap_or(current.lo());
        let hi = coerce_number(b).unwrap_or(current.hi());
        XRange::normalized(lo, hi)
    }
}

/// Numbers pass through; numeric strings are parsed. Anything non-finite is
/// treated as a coercion failure.
fn coerce_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Booleans pass through; `"true"`/`"false"` (any case) and `0`/`1` are
/// accepted.
fn coerce_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn is_known_key(key: &str) -> bool {
    let curve_key = |k: &CurveKeys| {
        [
            k.threshold,
            k.constant,
            k.bias,
            k.bias_base,
            k.auto_rollover,
            k.bias_add_option,
            k.entry_price,
        ]
        .contains(&key)
    };
    curve_key(&CURVE1_KEYS)
        || curve_key(&CURVE2_KEYS)
        || OTHER_KEYS.contains(&key)
        || Toggle::ALL.iter().any(|t| t.key() == key)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
