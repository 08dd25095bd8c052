//! Static keyword table used by the keyword category scorer.
//!
//! Terms are lowercase and matched as substrings of the lowercased title and
//! description, so short terms should be chosen with care. French and
//! English vocabulary are both listed because listings are written in either.

use crate::models::Category;

/// Keywords, synonyms and exclusions for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryKeywordEntry {
    pub category: Category,
    /// Strong signals, +3 each.
    pub keywords: &'static [&'static str],
    /// Weaker signals (brands, materials, usage), +2 each.
    pub synonyms: &'static [&'static str],
    /// Terms that point away from this category, -2 each.
    pub exclusions: &'static [&'static str],
}

/// One entry per category except `Other`, in `Category::ALL` order.
pub const CATEGORY_KEYWORDS: &[CategoryKeywordEntry] = &[
    CategoryKeywordEntry {
        category: Category::Tools,
        keywords: &[
            "perceuse", "visseuse", "marteau", "scie", "tournevis", "ponceuse", "outil",
            "meuleuse", "clé à molette", "niveau à bulle", "drill", "hammer", "screwdriver",
            "sander", "wrench", "toolbox",
        ],
        synonyms: &[
            "bosch", "makita", "dewalt", "ryobi", "black+decker", "bricolage", "électrique",
            "18v", "sans fil", "cordless", "établi", "diy",
        ],
        exclusions: &["jouet", "toy", "enfant"],
    },
    CategoryKeywordEntry {
        category: Category::Electronics,
        keywords: &[
            "téléphone", "smartphone", "ordinateur", "laptop", "tablette", "écran",
            "télévision", "console", "enceinte", "appareil photo", "casque audio", "phone",
            "computer", "tablet", "monitor", "camera", "headphones", "speaker",
        ],
        synonyms: &[
            "usb", "bluetooth", "hdmi", "chargeur", "charger", "batterie", "wifi", "numérique",
            "digital", "apple", "samsung", "sony",
        ],
        exclusions: &["jouet", "toy"],
    },
    CategoryKeywordEntry {
        category: Category::Books,
        keywords: &[
            "livre", "roman", "bande dessinée", "manga", "dictionnaire", "encyclopédie",
            "book", "novel", "comic", "magazine",
        ],
        synonyms: &[
            "auteur", "author", "édition", "edition", "poche", "paperback", "tome", "lecture",
            "reading", "pages",
        ],
        exclusions: &["livre sterling"],
    },
    CategoryKeywordEntry {
        category: Category::Clothing,
        keywords: &[
            "veste", "manteau", "pantalon", "chemise", "robe", "pull", "jupe", "chaussures",
            "baskets", "jacket", "coat", "trousers", "shirt", "dress", "sweater", "shoes",
            "sneakers",
        ],
        synonyms: &[
            "taille", "size", "coton", "cotton", "laine", "wool", "vêtement", "clothes",
            "zara", "nike", "adidas",
        ],
        exclusions: &["poupée", "doll"],
    },
    CategoryKeywordEntry {
        category: Category::Furniture,
        keywords: &[
            "chaise", "table", "canapé", "armoire", "commode", "étagère", "bureau", "matelas",
            "sommier", "fauteuil", "chair", "sofa", "wardrobe", "dresser", "shelf", "desk", "bed",
            "armchair",
        ],
        synonyms: &[
            "bois", "wood", "ikea", "meuble", "furniture", "massif", "tiroir", "drawer",
        ],
        exclusions: &["table de mixage", "jouet", "toy"],
    },
    CategoryKeywordEntry {
        category: Category::Kitchen,
        keywords: &[
            "casserole", "poêle", "assiette", "couverts", "verre", "saladier", "cocotte",
            "frying pan", "plate", "cutlery", "bowl", "mug", "teapot",
        ],
        synonyms: &[
            "cuisine", "kitchen", "inox", "stainless", "vaisselle", "dishes", "le creuset",
            "tefal",
        ],
        exclusions: &["dînette", "jouet", "toy"],
    },
    CategoryKeywordEntry {
        category: Category::Garden,
        keywords: &[
            "tondeuse", "taille-haie", "râteau", "pelle", "arrosoir", "brouette", "sécateur",
            "plante", "lawn mower", "rake", "shovel", "wheelbarrow", "plant",
        ],
        synonyms: &[
            "jardin", "garden", "pelouse", "lawn", "pot de fleur", "graines", "seeds",
            "potager",
        ],
        exclusions: &["jouet", "toy"],
    },
    CategoryKeywordEntry {
        category: Category::Sports,
        keywords: &[
            "vélo", "ballon", "raquette", "haltère", "tapis de yoga", "ski", "patins", "trottinette",
            "bicycle", "ball", "racket", "dumbbell", "skates", "scooter",
        ],
        synonyms: &[
            "sport", "fitness", "musculation", "training", "decathlon", "football", "tennis",
            "running",
        ],
        exclusions: &["console", "jeu vidéo"],
    },
    CategoryKeywordEntry {
        category: Category::Toys,
        keywords: &[
            "jouet", "poupée", "peluche", "puzzle", "lego", "playmobil", "jeu de société",
            "toy", "doll", "plush", "board game",
        ],
        synonyms: &["enfant", "kids", "child", "jeu", "game", "figurine", "construction"],
        exclusions: &["jeu vidéo pc"],
    },
    CategoryKeywordEntry {
        category: Category::Music,
        keywords: &[
            "guitare", "piano", "violon", "batterie acoustique", "synthétiseur", "ukulélé",
            "flûte", "guitar", "violin", "drum kit", "synthesizer", "vinyl", "vinyle",
        ],
        synonyms: &[
            "musique", "music", "ampli", "amplifier", "partition", "yamaha", "fender",
            "instrument",
        ],
        exclusions: &["jouet", "toy"],
    },
    CategoryKeywordEntry {
        category: Category::Baby,
        keywords: &[
            "poussette", "siège auto", "biberon", "lit parapluie", "chaise haute", "landau",
            "stroller", "car seat", "baby bottle", "high chair", "crib",
        ],
        synonyms: &[
            "bébé", "baby", "naissance", "newborn", "nourrisson", "infant", "puériculture",
        ],
        exclusions: &[],
    },
    CategoryKeywordEntry {
        category: Category::Appliances,
        keywords: &[
            "aspirateur", "lave-linge", "micro-ondes", "réfrigérateur", "frigo",
            "grille-pain", "bouilloire", "cafetière", "fer à repasser", "mixeur", "vacuum",
            "washing machine", "microwave", "fridge", "toaster", "kettle", "coffee maker",
        ],
        synonyms: &[
            "électroménager", "appliance", "électrique", "philips", "moulinex", "seb",
            "dyson", "watts",
        ],
        exclusions: &["jouet", "toy", "dînette"],
    },
    CategoryKeywordEntry {
        category: Category::Decoration,
        keywords: &[
            "lampe", "miroir", "tableau", "cadre", "vase", "bougie", "tapis", "rideau",
            "coussin", "lamp", "mirror", "painting", "frame", "candle", "rug", "curtain",
            "cushion",
        ],
        synonyms: &["déco", "decor", "décoration", "vintage", "salon", "living room"],
        exclusions: &["tapis de yoga", "tapis de course"],
    },
    CategoryKeywordEntry {
        category: Category::Vehicles,
        keywords: &[
            "voiture", "moto", "scooter électrique", "remorque", "pneu", "porte-vélo",
            "motorbike", "trailer", "tyre", "tire",
        ],
        synonyms: &[
            "auto", "automobile", "garage", "kilomètres", "mileage", "permis", "carburant",
        ],
        exclusions: &["jouet", "toy", "miniature", "carte", "card"],
    },
    CategoryKeywordEntry {
        category: Category::Crafts,
        keywords: &[
            "machine à coudre", "laine à tricoter", "pinceau", "peinture acrylique", "perles",
            "tissu", "sewing machine", "yarn", "paintbrush", "fabric", "beads",
        ],
        synonyms: &[
            "loisirs créatifs", "crafts", "couture", "sewing", "tricot", "knitting",
            "scrapbooking", "aquarelle",
        ],
        exclusions: &[],
    },
    CategoryKeywordEntry {
        category: Category::Outdoor,
        keywords: &[
            "tente", "sac de couchage", "réchaud", "glacière", "barbecue", "hamac",
            "randonnée", "tent", "sleeping bag", "camping stove", "cooler", "hammock",
        ],
        synonyms: &[
            "camping", "plein air", "outdoor", "trekking", "hiking", "bivouac", "quechua",
        ],
        exclusions: &[],
    },
];

/// Entry for a category, if it has one (`Other` does not).
pub fn entry_for(category: Category) -> Option<&'static CategoryKeywordEntry> {
    CATEGORY_KEYWORDS.iter().find(|e| e.category == category)
}
