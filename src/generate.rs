//! Synthetic datasets of mobile phones

use derivative::Derivative;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{base::AttributeValue, data::Row};

const BRANDS: [&str; 12] = [
    "Samsung", "Apple", "Xiaomi", "OnePlus", "Huawei", "Motorola", "Realme", "Oppo", "Sony",
    "Asus", "Nokia", "Google",
];

const DEFAULT_PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Progress bar style shared by the generator and the CLI
pub fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DEFAULT_PROGRESS_TEMPLATE)
        .progress_chars("=> ")
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct GeneratorOptions {
    #[derivative(Default(value = "30"))]
    pub count: usize,

    /// Seed for reproducible datasets (random if none)
    pub seed: Option<u64>,

    /// Show a progress bar
    pub progress: bool,
}

fn round_to(value: AttributeValue, decimals: i32) -> AttributeValue {
    let factor = (10. as AttributeValue).powi(decimals);
    (value * factor).round() / factor
}

/// Generates a dataset of phones with the attributes `model`,
/// `display_freq` (Hz), `battery` (mAh), `price`, `ram` (GB), `size`
/// (inches) and `camera_res` (Mpx)
pub fn generate_phones(options: &GeneratorOptions) -> Vec<Row> {
    let mut rng = if let Some(seed) = options.seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    };

    let progress = if options.progress {
        let progress = ProgressBar::new(options.count as u64);
        progress.set_style(pb_style());
        Some(progress)
    } else {
        None
    };

    let mut phones = Vec::with_capacity(options.count);
    for ix in 0..options.count {
        let brand = BRANDS[rng.gen_range(0..BRANDS.len())];

        phones.push(
            Row::new()
                .with("model", format!("{} Model {}", brand, ix + 1).as_str())
                .with("display_freq", rng.gen_range(60..=144) as AttributeValue)
                .with("battery", rng.gen_range(3000..=6000) as AttributeValue)
                .with("price", rng.gen_range(3000..=40000) as AttributeValue)
                .with("ram", rng.gen_range(3..=16) as AttributeValue)
                .with("size", round_to(rng.gen_range(4.5..=7.2), 2))
                .with("camera_res", round_to(rng.gen_range(8.0..=108.0), 1)),
        );

        if let Some(progress) = &progress {
            progress.inc(1);
        }
    }

    if let Some(progress) = progress {
        progress.finish();
    }
    info!("Generated {} phones", phones.len());
    phones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let options = GeneratorOptions {
            count: 100,
            seed: Some(7),
            progress: false,
        };
        let phones = generate_phones(&options);
        assert_eq!(phones.len(), 100);

        for (ix, phone) in phones.iter().enumerate() {
            let model = phone.get("model").unwrap().to_string();
            assert!(model.ends_with(&format!(" Model {}", ix + 1)), "{}", model);

            let freq = phone.number(ix, "display_freq").unwrap();
            assert!((60. ..=144.).contains(&freq));
            let size = phone.number(ix, "size").unwrap();
            assert!((4.5..=7.2).contains(&size));
            assert_eq!(round_to(size, 2), size);
            let price = phone.number(ix, "price").unwrap();
            assert!((3000. ..=40000.).contains(&price));
        }

        // Same seed, same dataset
        assert_eq!(generate_phones(&options), phones);
        assert_eq!(GeneratorOptions::default().count, 30);
    }

    #[test]
    fn test_progress_style() {
        let progress = ProgressBar::hidden();
        progress.set_length(2);
        progress.set_style(pb_style());
        progress.set_message("price_norm");
        progress.inc(2);
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
