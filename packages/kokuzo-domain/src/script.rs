//! Character classes of the corpus's native script.
//!
//! The ranges live here as data so the ranking code never carries script literals of its own.

use std::ops::RangeInclusive;

use unicode_script::{Script, UnicodeScript};

const JAPANESE_SCRIPTS: &[Script] = &[Script::Han, Script::Hiragana, Script::Katakana];
const JAPANESE_EXTRAS: &[RangeInclusive<char>] = &[
	// iteration marks and ideographic zero
	'\u{3005}'..='\u{3007}',
	// prolonged sound marks (full and half width)
	'\u{30FC}'..='\u{30FC}',
	'\u{FF70}'..='\u{FF70}',
];
const JAPANESE_PUNCTUATION: &[RangeInclusive<char>] = &[
	'\u{2010}'..='\u{2027}',
	'\u{2030}'..='\u{205E}',
	'\u{2190}'..='\u{21FF}',
	'\u{25A0}'..='\u{25FF}',
	'\u{2600}'..='\u{26FF}',
	'\u{3000}'..='\u{3004}',
	'\u{3008}'..='\u{3020}',
	'\u{3030}'..='\u{3030}',
	'\u{303D}'..='\u{303D}',
	'\u{30FB}'..='\u{30FB}',
	'\u{FF01}'..='\u{FF0F}',
	'\u{FF1A}'..='\u{FF20}',
	'\u{FF3B}'..='\u{FF40}',
	'\u{FF5B}'..='\u{FF65}',
];

#[derive(Clone, Copy, Debug)]
pub struct ScriptProfile {
	scripts: &'static [Script],
	extras: &'static [RangeInclusive<char>],
	punctuation: &'static [RangeInclusive<char>],
}
impl ScriptProfile {
	pub const fn japanese() -> Self {
		Self { scripts: JAPANESE_SCRIPTS, extras: JAPANESE_EXTRAS, punctuation: JAPANESE_PUNCTUATION }
	}

	pub fn is_native(&self, ch: char) -> bool {
		if ch.is_ascii() {
			return false;
		}

		self.scripts.contains(&ch.script()) || in_ranges(self.extras, ch)
	}

	/// ASCII punctuation and symbols plus the native script's punctuation blocks.
	pub fn is_punctuation(&self, ch: char) -> bool {
		if ch.is_ascii() {
			return ch.is_ascii_punctuation();
		}

		in_ranges(self.punctuation, ch)
	}

	/// True once `min` native characters have been seen; stops scanning early.
	pub fn has_min_density(&self, text: &str, min: usize) -> bool {
		if min == 0 {
			return true;
		}

		let mut seen = 0_usize;

		for ch in text.chars() {
			if !self.is_native(ch) {
				continue;
			}

			seen += 1;

			if seen >= min {
				return true;
			}
		}

		false
	}
}
impl Default for ScriptProfile {
	fn default() -> Self {
		Self::japanese()
	}
}

fn in_ranges(ranges: &[RangeInclusive<char>], ch: char) -> bool {
	ranges.iter().any(|range| range.contains(&ch))
}
