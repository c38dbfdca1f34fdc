// Text primitives shared by every stage of the pipeline.
//
// Normalization, tokenization and shingling feed both the item deduper and
// the phrase grouper; URL canonicalization gives the deduper its identity key.

pub mod counter;
pub mod normalize;
pub mod similarity;
pub mod url;

pub use counter::FrequencyCounter;
pub use normalize::{limit_tag_length, normalize, shingles, tokenize, MAX_TAG_LENGTH};
pub use similarity::{jaccard, jaccard_sets};
pub use url::canonicalize_url;
