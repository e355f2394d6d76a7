//! The built-in Indonesian sentiment corpus used when no trained model is on disk.

use crate::classifier::{ClassDefinition, Classifier, ClassifierError};

/// Class labels by class index.
pub const CLASSES: [&str; 3] = ["positif", "negatif", "netral"];

const POSITIF: [&str; 3] = [
    "saya sangat senang hari ini",
    "produk ini sangat bagus",
    "pelayanan yang memuaskan",
];

const NEGATIF: [&str; 3] = [
    "saya tidak suka dengan produk ini",
    "pelayanan yang buruk",
    "pengalaman yang mengecewakan",
];

const NETRAL: [&str; 3] = [
    "barang ini biasa saja",
    "tidak ada komentar",
    "standar saja",
];

/// Class definitions in `CLASSES` order.
pub fn class_definitions() -> Vec<ClassDefinition> {
    vec![
        ClassDefinition::new(CLASSES[0], "Sentimen positif").with_examples(POSITIF.to_vec()),
        ClassDefinition::new(CLASSES[1], "Sentimen negatif").with_examples(NEGATIF.to_vec()),
        ClassDefinition::new(CLASSES[2], "Sentimen netral").with_examples(NETRAL.to_vec()),
    ]
}

/// Every (text, class index) pair of the corpus.
pub fn examples() -> Vec<(&'static str, usize)> {
    [POSITIF, NEGATIF, NETRAL]
        .iter()
        .enumerate()
        .flat_map(|(label, texts)| texts.iter().map(move |&text| (text, label)))
        .collect()
}

/// Fits a fresh classifier on the corpus. Deterministic.
pub fn train() -> Result<Classifier, ClassifierError> {
    class_definitions()
        .into_iter()
        .try_fold(Classifier::builder(), |builder, class| builder.add_class(class))?
        .build()
}
