//! SKU suggestions for the product registration form.

use rand::Rng;

/// Suggest a SKU of the form `CAT-PART-NNN`.
///
/// `CAT` is the first three letters of the category (`GEN` when blank), `PART`
/// the first three letters of each of the first two words of the name, and
/// `NNN` a random number in `100..=999`. A blank name yields an empty string.
///
/// A whitespace-only category is deliberately treated as blank (`GEN`) rather
/// than producing a prefix of spaces.
pub fn suggest_sku<R: Rng + ?Sized>(name: &str, category: &str, rng: &mut R) -> String {
    if name.trim().is_empty() {
        return String::new();
    }

    let category = category.trim();
    let prefix = if category.is_empty() {
        "GEN".to_string()
    } else {
        category.chars().take(3).collect::<String>().to_uppercase()
    };

    let part = name
        .split_whitespace()
        .take(2)
        .map(|word| word.chars().take(3).collect::<String>())
        .collect::<String>()
        .to_uppercase();

    let suffix: u16 = rng.gen_range(100..=999);
    format!("{prefix}-{part}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn builds_prefix_and_part() {
        let mut rng = StdRng::seed_from_u64(7);
        let sku = suggest_sku("Notebook Dell G15", "Eletronicos", &mut rng);
        assert!(sku.starts_with("ELE-NOTDEL-"), "got {sku}");
        let n: u16 = sku.rsplit('-').next().unwrap().parse().unwrap();
        assert!((100..=999).contains(&n));
    }

    #[test]
    fn blank_category_uses_gen() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(suggest_sku("Mouse", "  ", &mut rng).starts_with("GEN-MOU-"));
    }

    #[test]
    fn blank_name_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(suggest_sku("", "Gamer", &mut rng), "");
    }
}
