/// A ready-made (locator, identifier) pair listed on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub title: &'static str,
    pub csv: &'static str,
    pub id: &'static str,
}

pub const EXAMPLES: [Example; 10] = [
    Example { title: "Bronze", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d01銅_s1.csv", id: "中銅000651" },
    Example { title: "Jade", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d02玉_s1.csv", id: "故玉002103" },
    Example { title: "Porcelain", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d03瓷_s1.csv", id: "故瓷014204" },
    Example { title: "Enamel", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d04琺_s1.csv", id: "故琺000844" },
    Example { title: "Miscellaneous", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d05雜_s1.csv", id: "故雜001599" },
    Example { title: "Stationery", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d06文_s1.csv", id: "故文000071" },
    Example { title: "Painting", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d20畫_s1.csv", id: "故畫00124400014" },
    Example { title: "Calligraphy", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d21書_s1.csv", id: "故書00014100000" },
    Example { title: "Rubbings", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d22帖_s1.csv", id: "故帖00000100000" },
    Example { title: "Folding fan", csv: "https://raw.githubusercontent.com/muse-101/npm-dataset/main/d23扇_s1.csv", id: "故扇001592" },
];

pub fn examples() -> &'static [Example] {
    &EXAMPLES
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET_BASE: &str = "https://raw.githubusercontent.com/muse-101/npm-dataset/main/";

    #[test]
    fn test_examples_are_complete() {
        assert_eq!(examples().len(), 10);
        for ex in examples() {
            assert!(ex.csv.starts_with(DATASET_BASE), "{}", ex.csv);
            assert!(ex.csv.ends_with("_s1.csv"));
            assert!(!ex.id.trim().is_empty());
        }
    }
}
