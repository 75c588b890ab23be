//! Seeded synthetic table used for every fixture
//!
//! Columns:
//! - `plain`: Int64, 0..rows, no nulls
//! - `plain_random`: Int64, uniform in 0..rows, no nulls
//! - `nested_nulls`: nullable Struct { string: Utf8?, int: Int64? }
//! - `list`: nullable List<Int64?> with 0..20 elements per row
//!
//! Nulls are drawn independently at every nesting level.

use crate::error::{FixtureError, Result};
use arrow::array::{
    ArrayRef, BooleanBufferBuilder, Int64Array, Int64Builder, ListBuilder, RecordBatch,
    StringArray, StructArray,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Field, Fields};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const CATEGORIES: [&str; 3] = ["foo", "bar", "baz"];
/// Exclusive upper bound of `nested_nulls.int` values and list element values.
const VALUE_RANGE: i64 = 42;
/// Exclusive upper bound of list lengths.
const MAX_LIST_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpec {
    pub seed: u64,
    pub rows: usize,
    pub null_probability: f64,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            seed: 12345,
            rows: 30,
            null_probability: 0.2,
        }
    }
}

impl TableSpec {
    pub fn validate(&self) -> Result<()> {
        if !self.null_probability.is_finite() || !(0.0..=1.0).contains(&self.null_probability) {
            return Err(FixtureError::InvalidTableSpec {
                message: format!(
                    "null_probability must be within [0, 1], got {}",
                    self.null_probability
                ),
            });
        }
        if self.rows == 0 {
            return Err(FixtureError::InvalidTableSpec {
                message: "rows must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

struct TableRng {
    rng: StdRng,
    null_probability: f64,
}

impl TableRng {
    fn is_null(&mut self) -> bool {
        self.rng.gen_bool(self.null_probability)
    }

    /// Validity bitmap with `len` slots, each null with the configured probability.
    fn validity(&mut self, len: usize) -> NullBuffer {
        let mut builder = BooleanBufferBuilder::new(len);
        for _ in 0..len {
            let valid = !self.is_null();
            builder.append(valid);
        }
        NullBuffer::new(builder.finish())
    }
}

/// Build the fixture table. Equal `TableSpec`s yield equal batches.
pub fn build_table(spec: &TableSpec) -> Result<RecordBatch> {
    spec.validate()?;

    let n = spec.rows;
    let mut rng = TableRng {
        rng: StdRng::seed_from_u64(spec.seed),
        null_probability: spec.null_probability,
    };

    let plain: ArrayRef = Arc::new(Int64Array::from_iter_values(0..n as i64));
    let plain_random: ArrayRef = Arc::new(Int64Array::from_iter_values(
        (0..n).map(|_| rng.rng.gen_range(0..n as i64)),
    ));

    let nested_nulls = build_nested(&mut rng, n)?;
    let list = build_list(&mut rng, n);

    let batch = RecordBatch::try_from_iter_with_nullable(vec![
        ("plain", plain, false),
        ("plain_random", plain_random, false),
        ("nested_nulls", nested_nulls, true),
        ("list", list, true),
    ])?;
    Ok(batch)
}

fn build_nested(rng: &mut TableRng, n: usize) -> Result<ArrayRef> {
    let picks: Vec<&str> = (0..n)
        .map(|_| CATEGORIES[rng.rng.gen_range(0..CATEGORIES.len())])
        .collect();
    let string_validity = rng.validity(n);
    let strings: StringArray = picks
        .into_iter()
        .zip(string_validity.iter())
        .map(|(value, valid)| valid.then_some(value))
        .collect();

    let ints: Vec<i64> = (0..n).map(|_| rng.rng.gen_range(0..VALUE_RANGE)).collect();
    let ints = Int64Array::new(ints.into(), Some(rng.validity(n)));

    let fields = Fields::from(vec![
        Field::new("string", DataType::Utf8, true),
        Field::new("int", DataType::Int64, true),
    ]);
    let struct_validity = rng.validity(n);
    let nested = StructArray::try_new(
        fields,
        vec![Arc::new(strings) as ArrayRef, Arc::new(ints) as ArrayRef],
        Some(struct_validity),
    )?;
    Ok(Arc::new(nested))
}

fn build_list(rng: &mut TableRng, n: usize) -> ArrayRef {
    let mut builder = ListBuilder::new(Int64Builder::new());
    // One extra choice beyond the value range stands for null.
    let lengths: Vec<usize> = (0..n).map(|_| rng.rng.gen_range(0..MAX_LIST_LEN)).collect();
    for len in lengths {
        let elements: Vec<Option<i64>> = (0..len)
            .map(|_| {
                let choice = rng.rng.gen_range(0..=VALUE_RANGE);
                (choice != VALUE_RANGE).then_some(choice)
            })
            .collect();
        let valid = !rng.is_null();
        // null rows hold no elements
        if valid {
            builder.values().extend(elements);
        }
        builder.append(valid);
    }
    Arc::new(builder.finish())
}
