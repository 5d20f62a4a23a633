//! Output tagging for a scheduled curriculum.
//!
//! Derives per-unit tags (source-list labels, number/radical flags, how many
//! other emitted units use a character as a component) and a frequency band,
//! and drops structural-only characters that are rarely reused.

use pyo3::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::ClassifyConfig;
use crate::log_checks;
use crate::models::{LookupStore, Unit};

/// Reverse component index: form -> number of emitted units listing it.
pub type ComponentCounts<'a> = FxHashMap<&'a str, usize>;

/// Coarse difficulty label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrequencyBand {
    Elementary,
    Intermediate,
    Advanced,
}

impl FrequencyBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elementary => "Elementary",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emitted unit with its output tags.
#[pyclass]
#[derive(Clone, Debug)]
pub struct TaggedUnit {
    #[pyo3(get)]
    pub unit: Unit,
    #[pyo3(get)]
    pub tags: Vec<String>,
    /// Only computed for single characters
    #[pyo3(get)]
    pub component_of: Option<usize>,
    pub band: FrequencyBand,
}

impl TaggedUnit {
    /// Display form, pinyin, gloss, space-joined tags, band label.
    pub fn record_fields(&self) -> [String; 5] {
        [
            self.unit.display_form.clone(),
            self.unit.pinyin.clone(),
            self.unit.gloss.clone(),
            self.tags.join(" "),
            self.band.as_str().to_string(),
        ]
    }
}

#[pymethods]
impl TaggedUnit {
    #[getter(band)]
    fn py_band(&self) -> &'static str {
        self.band.as_str()
    }

    #[pyo3(name = "record_fields")]
    fn py_record_fields(&self) -> Vec<String> {
        self.record_fields().to_vec()
    }

    fn __repr__(&self) -> String {
        format!(
            "TaggedUnit(form={:?}, tags={:?}, band={})",
            self.unit.normalized_form, self.tags, self.band
        )
    }
}

/// Count, once per emitted unit, each distinct component it lists other than itself.
pub fn build_component_counts<'a>(
    ordered: &'a [Unit],
    lookups: &'a LookupStore,
) -> ComponentCounts<'a> {
    let mut counts: ComponentCounts =
        FxHashMap::with_capacity_and_hasher(ordered.len(), Default::default());
    for unit in ordered {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for component in lookups.components_of(unit) {
            let component = component.as_str();
            if component != unit.normalized_form && seen.insert(component) {
                *counts.entry(component).or_default() += 1;
            }
        }
    }
    counts
}

/// Level from the first preferred list the unit belongs to, else its lowest level.
pub fn bucket_level(unit: &Unit, preferred_lists: &[String]) -> Option<u32> {
    preferred_lists
        .iter()
        .find_map(|list| {
            unit.bucket_tags
                .iter()
                .filter(|tag| &tag.list == list)
                .map(|tag| tag.level)
                .min()
        })
        .or_else(|| unit.bucket_tags.iter().map(|tag| tag.level).min())
}

/// Band from bucket level, falling back to frequency rank.
pub fn frequency_band(
    unit: &Unit,
    lookups: &LookupStore,
    config: &ClassifyConfig,
) -> FrequencyBand {
    if let Some(level) = bucket_level(unit, &config.preferred_lists) {
        if level < config.elementary_level_below {
            return FrequencyBand::Elementary;
        }
        if level < config.intermediate_level_below {
            return FrequencyBand::Intermediate;
        }
    }

    let rank = unit
        .frequency_rank
        .or_else(|| lookups.frequency_rank(&unit.normalized_form));
    match rank {
        Some(rank) if rank < config.elementary_rank_below => FrequencyBand::Elementary,
        Some(rank) if rank < config.intermediate_rank_below => FrequencyBand::Intermediate,
        _ => FrequencyBand::Advanced,
    }
}

/// Tag every emitted unit in order, dropping rarely reused structural characters.
pub fn classify(
    ordered: &[Unit],
    lookups: &LookupStore,
    config: &ClassifyConfig,
) -> Vec<TaggedUnit> {
    let counts = build_component_counts(ordered, lookups);
    let mut tagged = Vec::with_capacity(ordered.len());

    for unit in ordered {
        let form = unit.normalized_form.as_str();
        let component_of = unit
            .is_atomic()
            .then(|| counts.get(form).copied().unwrap_or(0));

        if config.drop_rare_components
            && unit.bucket_tags.is_empty()
            && component_of.is_some_and(|n| n <= 1)
        {
            log_checks!(
                config.verbosity,
                "  Drop {}: structural only, component of {:?}",
                form,
                component_of
            );
            continue;
        }

        let mut tags: Vec<String> = unit.bucket_tags.iter().map(|tag| tag.label()).collect();
        if lookups.is_number(form) {
            tags.push("number".to_string());
        }
        if lookups.is_radical(form) {
            tags.push("radical".to_string());
        }
        if let Some(n) = component_of.filter(|&n| n > 0) {
            tags.push(format!("component_of_{}", n));
        }

        tagged.push(TaggedUnit {
            unit: unit.clone(),
            tags,
            component_of,
            band: frequency_band(unit, lookups, config),
        });
    }

    tagged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_forms(tagged: &[TaggedUnit]) -> Vec<&str> {
        tagged
            .iter()
            .map(|t| t.unit.normalized_form.as_str())
            .collect()
    }

    #[test]
    fn test_component_counts_exclude_self_and_repeats() {
        let lookups = LookupStore::new()
            .with_decomposition("好", ["女", "子"])
            .with_decomposition("口", ["口"]);
        let ordered = vec![
            Unit::new("好", 1),
            Unit::new("妈妈", 1).with_decomposition(["女", "马", "女", "马"]),
            Unit::new("口", 1),
        ];

        let counts = build_component_counts(&ordered, &lookups);

        assert_eq!(counts.get("女"), Some(&2));
        assert_eq!(counts.get("马"), Some(&1));
        assert_eq!(counts.get("子"), Some(&1));
        assert_eq!(counts.get("口"), None);
    }

    #[test]
    fn test_tags_in_output_order() {
        let lookups = LookupStore::new()
            .with_radical("女")
            .with_decomposition("好", ["女", "子"])
            .with_decomposition("妈", ["女", "马"]);
        let ordered = vec![
            Unit::new("女", 1).with_tag("hsk3", 1).with_tag("hsk2", 1),
            Unit::new("好", 1).with_tag("hsk2", 1),
            Unit::new("妈", 1).with_tag("hsk2", 1),
        ];

        let tagged = classify(&ordered, &lookups, &ClassifyConfig::default());

        assert_eq!(
            tagged[0].tags,
            vec!["hsk2_1", "hsk3_1", "radical", "component_of_2"]
        );
        // component_of_0 is never rendered
        assert_eq!(tagged[1].tags, vec!["hsk2_1"]);
        assert_eq!(tagged[1].component_of, Some(0));
    }

    #[test]
    fn test_words_have_no_component_count() {
        let lookups = LookupStore::new().with_number("三");
        let ordered = vec![
            Unit::new("三", 1),
            Unit::new("三月", 1).with_decomposition(["三", "月"]).with_tag("hsk2", 1),
        ];
        let config = ClassifyConfig {
            drop_rare_components: false,
            ..ClassifyConfig::default()
        };

        let tagged = classify(&ordered, &lookups, &config);

        assert_eq!(tagged[0].tags, vec!["number", "component_of_1"]);
        assert_eq!(tagged[1].component_of, None);
    }

    #[test]
    fn test_rare_structural_characters_dropped() {
        let lookups = LookupStore::new();
        let ordered = vec![
            Unit::component("尔", vec!["⺈".to_string(), "小".to_string()]),
            Unit::component("门", Vec::new()),
            Unit::new("你", 1).with_decomposition(["亻", "尔"]).with_tag("hsk2", 1),
            Unit::new("们", 1).with_decomposition(["亻", "门"]).with_tag("hsk2", 1),
            Unit::new("问", 1).with_decomposition(["门", "口"]).with_tag("hsk2", 1),
            Unit::new("口", 1).with_tag("hsk2", 1),
        ];

        let tagged = classify(&ordered, &lookups, &ClassifyConfig::default());
        // 尔 is used once; 门 twice; 口 is tagged
        assert_eq!(tagged_forms(&tagged), vec!["门", "你", "们", "问", "口"]);
        assert_eq!(tagged[0].tags, vec!["component_of_2"]);

        let keep_all = ClassifyConfig {
            drop_rare_components: false,
            ..ClassifyConfig::default()
        };
        assert_eq!(classify(&ordered, &lookups, &keep_all).len(), ordered.len());
    }

    #[test]
    fn test_band_from_preferred_list_level() {
        let lookups = LookupStore::new();
        let config = ClassifyConfig::default();

        let hsk3_low = Unit::new("的", 1).with_tag("hsk2", 5).with_tag("hsk3", 1);
        assert_eq!(frequency_band(&hsk3_low, &lookups, &config), FrequencyBand::Elementary);

        let hsk2_mid = Unit::new("被", 1).with_tag("hsk2", 5);
        assert_eq!(frequency_band(&hsk2_mid, &lookups, &config), FrequencyBand::Intermediate);

        let other_list = Unit::new("猫", 1).with_tag("tocfl", 2);
        assert_eq!(bucket_level(&other_list, &config.preferred_lists), Some(2));
        assert_eq!(frequency_band(&other_list, &lookups, &config), FrequencyBand::Elementary);
    }

    #[test]
    fn test_band_falls_back_to_rank() {
        let lookups = LookupStore::new().with_frequency("虽然", 3000);
        let config = ClassifyConfig::default();

        let high_level = Unit::new("偶", 1).with_tag("hsk3", 8).with_rank(100);
        assert_eq!(frequency_band(&high_level, &lookups, &config), FrequencyBand::Elementary);

        let looked_up = Unit::new("虽然", 1);
        assert_eq!(frequency_band(&looked_up, &lookups, &config), FrequencyBand::Intermediate);

        let rare = Unit::new("龘", 1).with_rank(9000);
        assert_eq!(frequency_band(&rare, &lookups, &config), FrequencyBand::Advanced);

        let unknown = Unit::new("?", 1);
        assert_eq!(frequency_band(&unknown, &lookups, &config), FrequencyBand::Advanced);
    }

    #[test]
    fn test_record_fields() {
        let lookups = LookupStore::new();
        let ordered = vec![Unit::new("你好", 1)
            .with_display("你好（你們好）")
            .with_pinyin("nǐ hǎo")
            .with_gloss("hello")
            .with_tag("hsk2", 1)];

        let tagged = classify(&ordered, &lookups, &ClassifyConfig::default());

        assert_eq!(
            tagged[0].record_fields(),
            [
                "你好（你們好）".to_string(),
                "nǐ hǎo".to_string(),
                "hello".to_string(),
                "hsk2_1".to_string(),
                "Elementary".to_string(),
            ]
        );
    }
}
