/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use pubtex_core::reference::{Name, Reference};

const NO_DATE: &str = "n.d.";

/// A label already handed out.
#[derive(Debug, Clone)]
struct Assigned {
    key: String,
    reference: Option<Reference>,
    /// The formatter's label before disambiguation.
    rendered: String,
    label: String,
    suffix: Option<String>,
}

/// Keeps distinct references from sharing one visible citation label.
///
/// Labels are assigned in call order and are stable per key: asking again for
/// a key that already has a label returns that label unchanged.
///
/// Collisions are resolved by the first rule that applies:
/// 1. no earlier label renders the same: keep the rendered label;
/// 2. an earlier reference has the identical author list: no special case yet,
///    continue with rule 3;
/// 3. every colliding reference has the same first-author surname: add a
///    year suffix (`a`, `b`, ..., `z`, `aa`, `ab`, ...);
/// 4. every colliding reference has the same first-author initial: show more of
///    the given name plus the co-author surnames;
/// 5. otherwise: list the authors no colliding reference has, then "et al.".
#[derive(Debug, Clone, Default)]
pub struct Disambiguator {
    assigned: Vec<Assigned>,
}

impl Disambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The label assigned to `key`, if any.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.assigned
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.label.as_str())
    }

    /// Decide the visible label for `key`, given its style-rendered label.
    pub fn assign(&mut self, key: &str, reference: Option<&Reference>, rendered: &str) -> String {
        if let Some(label) = self.label(key) {
            return label.to_string();
        }

        let colliding: Vec<&Assigned> = self
            .assigned
            .iter()
            .filter(|a| a.rendered == rendered)
            .collect();

        let names: &[Name] = reference.map(Reference::names).unwrap_or_default();
        let year = reference
            .and_then(|r| r.year.as_deref())
            .unwrap_or(NO_DATE);

        let (label, suffix) = if colliding.is_empty() {
            (rendered.to_string(), None)
        } else {
            if colliding.iter().any(|a| same_names(a.names(), names)) {
                log::debug!("{} has the same authors as an earlier reference labelled {}", key, rendered);
            }

            let first = names.first();
            if colliding
                .iter()
                .all(|a| a.first_family() == first.map(|n| n.family.as_str()))
            {
                let previous = colliding.last().and_then(|a| a.suffix.as_deref());
                let suffix = next_suffix(previous);
                (with_year_suffix(rendered, &suffix), Some(suffix))
            } else if colliding
                .iter()
                .all(|a| a.first_initial() == first.and_then(Name::given_initial))
            {
                (expanded_initials(names, year), None)
            } else {
                (differing_authors(names, &colliding, year), None)
            }
        };

        log::debug!("citation label for {}: {}", key, label);
        self.assigned.push(Assigned {
            key: key.to_string(),
            reference: reference.cloned(),
            rendered: rendered.to_string(),
            label: label.clone(),
            suffix,
        });
        label
    }
}

impl Assigned {
    fn names(&self) -> &[Name] {
        self.reference
            .as_ref()
            .map(Reference::names)
            .unwrap_or_default()
    }

    fn first_family(&self) -> Option<&str> {
        self.names().first().map(|n| n.family.as_str())
    }

    fn first_initial(&self) -> Option<char> {
        self.names().first().and_then(Name::given_initial)
    }
}

fn same_names(a: &[Name], b: &[Name]) -> bool {
    !a.is_empty() && a == b
}

/// The suffix following `previous`; no previous suffix counts as none used.
///
/// Past `z` the sequence continues as `aa`, `ab`, ..., `az`, `ba`, ...
pub fn next_suffix(previous: Option<&str>) -> String {
    let Some(previous) = previous.filter(|p| !p.is_empty()) else {
        return "a".to_string();
    };
    let mut letters: Vec<u8> = previous.bytes().collect();
    let mut i = letters.len();
    loop {
        if i == 0 {
            letters.insert(0, b'a');
            break;
        }
        i -= 1;
        if letters[i] < b'z' {
            letters[i] += 1;
            break;
        }
        letters[i] = b'a';
    }
    String::from_utf8(letters).unwrap_or_else(|_| "a".to_string())
}

/// Attach `suffix` to the year at the end of a rendered label.
fn with_year_suffix(rendered: &str, suffix: &str) -> String {
    match rendered.strip_suffix(')') {
        Some(inner) => format!("{}{})", inner, suffix),
        None => format!("{}{}", rendered, suffix),
    }
}

fn expanded_initials(names: &[Name], year: &str) -> String {
    let Some((first, rest)) = names.split_first() else {
        return format!("({})", year);
    };
    let shown: String = first
        .given
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(2)
        .collect();
    let mut authors = if shown.is_empty() {
        first.family.clone()
    } else {
        format!("{}. {}", shown, first.family)
    };
    for name in rest {
        authors.push_str(", ");
        authors.push_str(&name.family);
    }
    format!("({}, {})", authors, year)
}

fn differing_authors(names: &[Name], colliding: &[&Assigned], year: &str) -> String {
    let mut differing: Vec<&str> = names
        .iter()
        .filter(|name| !colliding.iter().any(|a| a.names().contains(name)))
        .map(|name| name.family.as_str())
        .collect();
    if differing.is_empty() {
        differing.extend(names.first().map(|n| n.family.as_str()));
    }
    differing.push("et al.");
    format!("({}, {})", differing.join(", "), year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str, authors: &[(&str, &str)], year: &str) -> Reference {
        Reference {
            id: id.to_string(),
            author: authors.iter().map(|(f, g)| Name::new(f, g)).collect(),
            year: Some(year.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_label_is_kept() {
        let mut d = Disambiguator::new();
        let a = reference("a", &[("Lee", "Jae")], "2021");
        let b = reference("b", &[("Kim", "Su")], "2021");
        assert_eq!(d.assign("a", Some(&a), "(Lee, 2021)"), "(Lee, 2021)");
        assert_eq!(d.assign("b", Some(&b), "(Kim, 2021)"), "(Kim, 2021)");
    }

    #[test]
    fn test_same_first_author_gets_year_suffix() {
        let mut d = Disambiguator::new();
        let a = reference("a", &[("Lee", "Jae")], "2021");
        let b = reference("b", &[("Lee", "Min")], "2021");
        let c = reference("c", &[("Lee", "Hana")], "2021");
        assert_eq!(d.assign("a", Some(&a), "(Lee, 2021)"), "(Lee, 2021)");
        assert_eq!(d.assign("b", Some(&b), "(Lee, 2021)"), "(Lee, 2021a)");
        assert_eq!(d.assign("c", Some(&c), "(Lee, 2021)"), "(Lee, 2021b)");
    }

    #[test]
    fn test_identical_author_list_falls_through_to_suffix() {
        let mut d = Disambiguator::new();
        let a = reference("a", &[("Lee", "Jae")], "2021");
        let b = reference("b", &[("Lee", "Jae")], "2021");
        d.assign("a", Some(&a), "(Lee, 2021)");
        assert_eq!(d.assign("b", Some(&b), "(Lee, 2021)"), "(Lee, 2021a)");
    }

    #[test]
    fn test_same_initial_expands_given_name() {
        let mut d = Disambiguator::new();
        let a = reference("a", &[("Smith", "John"), ("Ray", "A")], "2020");
        let b = reference("b", &[("Smyth", "Jane"), ("Cole", "B")], "2020");
        d.assign("a", Some(&a), "(J. Smith et al., 2020)");
        assert_eq!(
            d.assign("b", Some(&b), "(J. Smith et al., 2020)"),
            "(Ja. Smyth, Cole, 2020)"
        );
    }

    #[test]
    fn test_otherwise_lists_differing_authors() {
        let mut d = Disambiguator::new();
        let a = reference("a", &[("Moss", "Ann"), ("Hart", "Bo"), ("Ng", "Cy")], "2019");
        let b = reference("b", &[("Ives", "Dan"), ("Hart", "Bo"), ("Oka", "Eve")], "2019");
        d.assign("a", Some(&a), "(Group, 2019)");
        assert_eq!(
            d.assign("b", Some(&b), "(Group, 2019)"),
            "(Ives, Oka, et al., 2019)"
        );
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let refs = [
            reference("a", &[("Lee", "Jae")], "2021"),
            reference("b", &[("Lee", "Min")], "2021"),
        ];
        let run = || {
            let mut d = Disambiguator::new();
            refs.iter()
                .map(|r| d.assign(&r.id, Some(r), "(Lee, 2021)"))
                .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());
        assert_ne!(first[0], first[1]);

        let mut d = Disambiguator::new();
        let label = d.assign("b", Some(&refs[1]), "(Lee, 2021)");
        assert_eq!(d.assign("b", Some(&refs[1]), "(Lee, 2021)"), label);
        assert_eq!(d.label("b"), Some(label.as_str()));
    }

    #[test]
    fn test_next_suffix() {
        assert_eq!(next_suffix(None), "a");
        assert_eq!(next_suffix(Some("a")), "b");
        assert_eq!(next_suffix(Some("y")), "z");
        assert_eq!(next_suffix(Some("z")), "aa");
        assert_eq!(next_suffix(Some("az")), "ba");
        assert_eq!(next_suffix(Some("zz")), "aaa");
    }
}
