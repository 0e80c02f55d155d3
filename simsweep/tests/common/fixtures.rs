//! Test fixtures and data for orchestrator tests
//!
//! This module provides consistent test data used across all test suites.

use shared::{ExperimentSet, ParamValue};
use std::collections::BTreeMap;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Two-field template used by the small scenarios
    pub const TEMPLATE: &'static str = "n: {0}\ntag: {1}\n";

    /// Excerpt of a real pHost configuration with automatic slots
    pub const PHOST_TEMPLATE: &'static str = "init_cwnd: {}
max_cwnd: {}
retx_timeout: {}
queue_size: {}
propagation_delay: 0.0000002
bandwidth: 10000000000.0
queue_type: 2
flow_type: 112
num_flow: 100000
flow_trace: {}
load: {}
";

    pub const EXPERIMENT_TYPE: i32 = 1;

    /// `{"a": (1, "x"), "b": (2, "y")}`
    pub fn two_experiments() -> ExperimentSet {
        let mut set = ExperimentSet::new();
        set.insert("a", vec![ParamValue::Int(1), ParamValue::from("x")]).unwrap();
        set.insert("b", vec![ParamValue::Int(2), ParamValue::from("y")]).unwrap();
        set
    }

    /// `count` experiments named `exp_00`, `exp_01`, ...
    pub fn numbered(count: usize) -> ExperimentSet {
        let mut set = ExperimentSet::new();
        for i in 0..count {
            set.insert(
                format!("exp_{i:02}"),
                vec![ParamValue::Int(i as i64), ParamValue::from(format!("tag{i}"))],
            )
            .unwrap();
        }
        set
    }

    /// A pHost sweep point in positional form
    pub fn phost_positional() -> ExperimentSet {
        let mut set = ExperimentSet::new();
        set.insert(
            "pHostNoPrio_dctcp_0.5_queue6200",
            vec![
                ParamValue::Int(4),
                ParamValue::Int(7),
                ParamValue::Float(9.50003e-06),
                ParamValue::Int(6200),
                ParamValue::from("../CDF_dctcp.txt"),
                ParamValue::Float(0.5),
            ],
        )
        .unwrap();
        set
    }

    /// The same pHost sweep point keyed by field name
    pub fn phost_named() -> ExperimentSet {
        let mut fields = BTreeMap::new();
        fields.insert("init_cwnd".to_string(), ParamValue::Int(4));
        fields.insert("max_cwnd".to_string(), ParamValue::Int(7));
        fields.insert("retx_timeout".to_string(), ParamValue::Float(9.50003e-06));
        fields.insert("queue_size".to_string(), ParamValue::Int(6200));
        fields.insert("flow_trace".to_string(), ParamValue::from("../CDF_dctcp.txt"));
        fields.insert("load".to_string(), ParamValue::Float(0.5));

        let mut set = ExperimentSet::new();
        set.insert("pHostNoPrio_dctcp_0.5_queue6200", fields).unwrap();
        set
    }
}
