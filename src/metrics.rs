//! The known Glances metrics and how to read each one out of the payload.

use serde_json::Value;

const GIB: f64 = (1u64 << 30) as f64;
const MIB: f64 = (1u64 << 20) as f64;

/// One step into the nested payload.
#[derive(Debug, Clone, Copy)]
enum Seg {
    Key(&'static str),
    Idx(usize),
}

type Path = &'static [Seg];

/// Computed as `minuend - subtrahend` when the primary path is absent.
struct Fallback {
    minuend: Path,
    subtrahend: Path,
}

/// Static description of a single metric: where its raw value lives in the
/// payload and how to convert it for display.
pub struct MetricSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    path: Path,
    /// `Some(divisor)` means divide and round to one decimal; `None` means
    /// the raw JSON value passes through unchanged.
    scale: Option<f64>,
    fallback: Option<Fallback>,
}

macro_rules! spec {
    ($id:literal, $name:literal, $unit:literal, $path:expr, $scale:expr) => {
        MetricSpec {
            id: $id,
            name: $name,
            unit: $unit,
            path: $path,
            scale: $scale,
            fallback: None,
        }
    };
}

/// All metrics this integration knows about, in display order.
pub const SENSOR_TYPES: &[MetricSpec] = &[
    spec!(
        "disk_use_percent",
        "Disk Use",
        "%",
        &[Seg::Key("fs"), Seg::Idx(0), Seg::Key("percent")],
        None
    ),
    spec!(
        "disk_use",
        "Disk Use",
        "GiB",
        &[Seg::Key("fs"), Seg::Idx(0), Seg::Key("used")],
        Some(GIB)
    ),
    MetricSpec {
        id: "disk_free",
        name: "Disk Free",
        unit: "GiB",
        path: &[Seg::Key("fs"), Seg::Idx(0), Seg::Key("free")],
        scale: Some(GIB),
        // Older Glances versions report size/used but no free field.
        fallback: Some(Fallback {
            minuend: &[Seg::Key("fs"), Seg::Idx(0), Seg::Key("size")],
            subtrahend: &[Seg::Key("fs"), Seg::Idx(0), Seg::Key("used")],
        }),
    },
    spec!(
        "memory_use_percent",
        "RAM Use",
        "%",
        &[Seg::Key("mem"), Seg::Key("percent")],
        None
    ),
    spec!(
        "memory_use",
        "RAM Use",
        "MiB",
        &[Seg::Key("mem"), Seg::Key("used")],
        Some(MIB)
    ),
    spec!(
        "memory_free",
        "RAM Free",
        "MiB",
        &[Seg::Key("mem"), Seg::Key("free")],
        Some(MIB)
    ),
    spec!(
        "swap_use_percent",
        "Swap Use",
        "%",
        &[Seg::Key("memswap"), Seg::Key("percent")],
        None
    ),
    spec!(
        "swap_use",
        "Swap Use",
        "GiB",
        &[Seg::Key("memswap"), Seg::Key("used")],
        Some(GIB)
    ),
    spec!(
        "swap_free",
        "Swap Free",
        "GiB",
        &[Seg::Key("memswap"), Seg::Key("free")],
        Some(GIB)
    ),
    spec!(
        "processor_load",
        "CPU Load",
        "",
        &[Seg::Key("load"), Seg::Key("min15")],
        None
    ),
    spec!(
        "process_running",
        "Running",
        "",
        &[Seg::Key("processcount"), Seg::Key("running")],
        None
    ),
    spec!(
        "process_total",
        "Total",
        "",
        &[Seg::Key("processcount"), Seg::Key("total")],
        None
    ),
    spec!(
        "process_thread",
        "Thread",
        "",
        &[Seg::Key("processcount"), Seg::Key("thread")],
        None
    ),
    spec!(
        "process_sleeping",
        "Sleeping",
        "",
        &[Seg::Key("processcount"), Seg::Key("sleeping")],
        None
    ),
];

/// Looks up the spec for a metric identifier, `None` for unknown ones.
pub fn metric_spec(id: &str) -> Option<&'static MetricSpec> {
    SENSOR_TYPES.iter().find(|spec| spec.id == id)
}

/// Extracts and converts one metric out of a payload.
///
/// # Panics
///
/// A payload that does not carry the fields the metric needs (including an
/// empty `fs` list for the disk metrics, or a non-numeric leaf where a
/// conversion applies) is a data-contract violation and panics.
pub fn value_of(payload: &Value, spec: &MetricSpec) -> Value {
    match lookup(payload, spec.path) {
        Some(raw) => match spec.scale {
            Some(divisor) => Value::from(round1(number(raw, spec.id) / divisor)),
            None => raw.clone(),
        },
        None => match &spec.fallback {
            Some(fb) => {
                let minuend = number(read(payload, fb.minuend, spec.id), spec.id);
                let subtrahend = number(read(payload, fb.subtrahend, spec.id), spec.id);
                let divisor = spec.scale.unwrap_or(1.0);
                Value::from(round1((minuend - subtrahend) / divisor))
            }
            None => panic!("glances payload has no value for metric '{}'", spec.id),
        },
    }
}

fn lookup<'a>(payload: &'a Value, path: Path) -> Option<&'a Value> {
    path.iter().try_fold(payload, |value, seg| match seg {
        Seg::Key(key) => value.get(key),
        Seg::Idx(idx) => value.get(idx),
    })
}

fn read<'a>(payload: &'a Value, path: Path, id: &str) -> &'a Value {
    lookup(payload, path)
        .unwrap_or_else(|| panic!("glances payload has no value for metric '{id}'"))
}

fn number(value: &Value, id: &str) -> f64 {
    value
        .as_f64()
        .unwrap_or_else(|| panic!("non-numeric value {value} for metric '{id}'"))
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(payload: &Value, id: &str) -> Value {
        value_of(payload, metric_spec(id).unwrap())
    }

    #[test]
    fn test_all_fourteen_metrics_known() {
        assert_eq!(SENSOR_TYPES.len(), 14);
        assert!(metric_spec("magic_smoke").is_none());
        assert_eq!(metric_spec("swap_free").unwrap().unit, "GiB");
        assert_eq!(metric_spec("processor_load").unwrap().name, "CPU Load");
    }

    #[test]
    fn test_percent_passes_through_unconverted() {
        let payload = json!({"fs": [{"percent": 42}]});
        assert_eq!(project(&payload, "disk_use_percent"), json!(42));
    }

    #[test]
    fn test_byte_counts_are_scaled_and_rounded() {
        let payload = json!({
            "fs": [{"used": 1610612736u64, "free": 4294967296u64}],
            "mem": {"used": 1048576, "percent": 10},
            "memswap": {"used": 3221225472u64, "free": 1073741824u64}
        });
        assert_eq!(project(&payload, "disk_use"), json!(1.5));
        assert_eq!(project(&payload, "disk_free"), json!(4.0));
        assert_eq!(project(&payload, "memory_use"), json!(1.0));
        assert_eq!(project(&payload, "memory_use_percent"), json!(10));
        assert_eq!(project(&payload, "swap_use"), json!(3.0));
        assert_eq!(project(&payload, "swap_free"), json!(1.0));
    }

    #[test]
    fn test_disk_free_computed_when_free_absent() {
        let payload = json!({"fs": [{"used": 2147483648u64, "size": 4294967296u64}]});
        assert_eq!(project(&payload, "disk_free"), json!(2.0));
    }

    #[test]
    fn test_load_and_process_counts() {
        let payload = json!({
            "load": {"min1": 0.7, "min5": 0.9, "min15": 1.1},
            "processcount": {"running": 2, "total": 211, "thread": 832, "sleeping": 209}
        });
        assert_eq!(project(&payload, "processor_load"), json!(1.1));
        assert_eq!(project(&payload, "process_running"), json!(2));
        assert_eq!(project(&payload, "process_total"), json!(211));
        assert_eq!(project(&payload, "process_thread"), json!(832));
        assert_eq!(project(&payload, "process_sleeping"), json!(209));
    }

    #[test]
    #[should_panic(expected = "no value for metric 'disk_use'")]
    fn test_empty_filesystem_list_is_fatal() {
        let payload = json!({"fs": []});
        project(&payload, "disk_use");
    }

    #[test]
    #[should_panic(expected = "non-numeric value")]
    fn test_non_numeric_leaf_is_fatal() {
        let payload = json!({"mem": {"used": "lots"}});
        project(&payload, "memory_use");
    }
}
