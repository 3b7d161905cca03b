use tantivy::collector::{Collector, SegmentCollector};
use tantivy::columnar::Column;
use tantivy::{DocId, Score, SegmentOrdinal, SegmentReader};

/// Collects the first value of an i64 fast field for every matching document.
/// Documents without a value are skipped.
pub struct NumericValues {
	field: String,
}

impl NumericValues {
	pub fn for_field(field: impl ToString) -> Self { Self { field: field.to_string() } }
}

pub struct SegmentNumericValues {
	column: Column<i64>,
	values: Vec<i64>,
}

impl Collector for NumericValues {
	type Fruit = Vec<i64>;
	type Child = SegmentNumericValues;

	fn for_segment(&self, _segment_local_id: SegmentOrdinal, reader: &SegmentReader) -> tantivy::Result<SegmentNumericValues> {
		let column = reader.fast_fields().i64(&self.field)?;
		Ok(SegmentNumericValues { column, values: Vec::new() })
	}

	fn requires_scoring(&self) -> bool { false }

	fn merge_fruits(&self, segment_fruits: Vec<Vec<i64>>) -> tantivy::Result<Vec<i64>> {
		Ok(segment_fruits.into_iter().flatten().collect())
	}
}

impl SegmentCollector for SegmentNumericValues {
	type Fruit = Vec<i64>;

	fn collect(&mut self, doc: DocId, _score: Score) {
		self.values.extend(self.column.first(doc));
	}

	fn harvest(self) -> Vec<i64> { self.values }
}
