//! Built-in dish, bread and vocabulary tables

use super::{BreadCategory, BreadEntry, DishEntry, DishType, GenericVocabulary};

fn dish(name: &str, dish_type: DishType, keywords: &[&str]) -> DishEntry {
    DishEntry {
        canonical_name: name.to_string(),
        dish_type,
        match_keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn bread(name: &str, category: BreadCategory, indian: bool, keywords: &[&str]) -> BreadEntry {
    BreadEntry {
        canonical_name: name.to_string(),
        category,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        indian,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn builtin_dishes() -> Vec<DishEntry> {
    use DishType::*;

    vec![
        // curries
        dish("Chana Masala", Curry, &["chana masala", "chole", "chhole", "chickpea curry", "chana"]),
        dish("Palak Paneer", Curry, &["palak paneer", "saag paneer", "spinach paneer"]),
        dish("Saag", Curry, &["saag", "sarson da saag", "sarson ka saag"]),
        dish("Paneer Butter Masala", Curry, &["paneer butter masala", "paneer makhani", "butter paneer"]),
        dish("Kadai Paneer", Curry, &["kadai paneer", "karahi paneer"]),
        dish("Matar Paneer", Curry, &["matar paneer", "mutter paneer"]),
        dish("Butter Chicken", Curry, &["butter chicken", "murgh makhani", "chicken makhani"]),
        dish("Chicken Tikka Masala", Curry, &["chicken tikka masala", "tikka masala"]),
        dish("Chicken Curry", Curry, &["chicken curry"]),
        dish("Hariyali Chicken", Curry, &["hariyali chicken"]),
        dish("Rajma", Curry, &["rajma", "kidney bean curry"]),
        dish("Aloo Gobi", Curry, &["aloo gobi"]),
        dish("Bhindi Masala", Curry, &["bhindi masala", "bhindi", "okra masala"]),
        dish("Dum Aloo", Curry, &["dum aloo"]),
        dish("Navratan Korma", Curry, &["navratan korma", "navrattan korma", "vegetable korma"]),
        dish("Malai Kofta", Curry, &["malai kofta", "kofta"]),
        // dals
        dish("Dal Tadka", Dal, &["dal tadka", "tadka dal", "dal fry", "yellow dal"]),
        dish("Dal Makhani", Dal, &["dal makhani", "maa ki dal"]),
        dish("Sambar", Dal, &["sambar", "sambhar"]),
        dish("Rasam", Dal, &["rasam"]),
        dish("Kadhi", Dal, &["kadhi", "kadhi pakoda", "kadhi pakora"]),
        // rice
        dish("Biryani", RiceDish, &["biryani", "biriyani", "briyani"]),
        dish("Pulao", RiceDish, &["pulao", "pulav", "pilaf", "pilau"]),
        dish("Khichdi", RiceDish, &["khichdi", "khichri", "kitchari"]),
        dish("Lemon Rice", RiceDish, &["lemon rice"]),
        dish("Jeera Rice", RiceDish, &["jeera rice"]),
        // bread dishes
        dish("Chole Bhature", FriedBread, &["chole bhature", "chole bhatura", "chana bhatura"]),
        dish("Aloo Paratha", StuffedBread, &["aloo paratha", "stuffed paratha"]),
        dish("Kathi Roll", StuffedBread, &["kathi roll", "kati roll"]),
        // snacks and sweets
        dish("Samosa", Snack, &["samosa"]),
        dish("Pakora", Snack, &["pakora", "pakoda"]),
        dish("Dosa", Snack, &["dosa", "masala dosa", "dosai"]),
        dish("Idli", Snack, &["idli"]),
        dish("Vada", Snack, &["vada", "medu vada"]),
        dish("Vada Pav", Snack, &["vada pav"]),
        dish("Pav Bhaji", Snack, &["pav bhaji"]),
        dish("Dhokla", Snack, &["dhokla"]),
        dish("Pani Puri", Snack, &["pani puri", "golgappa", "gol gappa", "puchka"]),
        dish("Aloo Tikki", Snack, &["aloo tikki"]),
        dish("Upma", Snack, &["upma"]),
        dish("Poha", Snack, &["poha"]),
        dish("Gulab Jamun", Snack, &["gulab jamun"]),
        dish("Jalebi", Snack, &["jalebi"]),
        dish("Rasgulla", Snack, &["rasgulla", "rasagola"]),
        dish("Kheer", Snack, &["kheer", "payasam"]),
    ]
}

pub fn builtin_breads() -> Vec<BreadEntry> {
    use BreadCategory::*;

    vec![
        bread("Roti", FlatBread, true, &["roti", "chapati", "chapatti", "phulka", "fulka"]),
        bread("Naan", LeavenedBread, true, &["naan", "nan bread", "butter naan", "garlic naan"]),
        bread("Paratha", FlatBread, true, &["paratha", "parantha", "parotta", "lachha paratha"]),
        bread("Puri", FriedBread, true, &["puri", "poori"]),
        bread("Bhatura", FriedBread, true, &["bhatura", "bhature", "bhatoora"]),
        bread("Kulcha", StuffedBread, true, &["kulcha", "amritsari kulcha"]),
        bread("Bhakri", FlatBread, true, &["bhakri", "jolada rotti", "jowar roti"]),
        bread("Thepla", FlatBread, true, &["thepla"]),
        bread("Pav", LeavenedBread, true, &["pav", "ladi pav"]),
        bread("Pita", LeavenedBread, false, &["pita", "pitta"]),
        bread("Tortilla", FlatBread, false, &["tortilla"]),
    ]
}

pub fn builtin_vocabulary() -> GenericVocabulary {
    GenericVocabulary {
        stoplist: strings(&[
            "food", "ingredient", "recipe", "dish", "meal", "cuisine", "staple food",
            "breakfast", "lunch", "dinner", "cooking", "tableware", "dishware",
            "plate", "bowl", "natural foods", "comfort food", "fast food",
            "produce", "vegetable", "fruit", "serveware", "condiment", "garnish",
            // colours carry no dish identity on their own
            "yellow", "orange", "red", "green", "blue", "purple", "black", "white",
            "brown", "pink", "color", "colour",
        ]),
        generic_curry: strings(&[
            "curry", "stew", "gravy", "masala", "sabji", "sabzi", "korma", "legume",
        ]),
        generic_dal: strings(&["dal", "daal", "dhal", "lentil"]),
        rename_to_dal: strings(&["curry", "stew", "gravy", "legume"]),
        rice: strings(&["rice", "basmati"]),
        rice_exclusions: strings(&["masala"]),
        indian_context: strings(&[
            "indian", "punjabi", "south indian", "north indian", "masala", "curry",
        ]),
        ingredients: strings(&[
            "lemon", "jeera", "cumin", "bean", "kidney bean", "kidney", "spinach", "okra",
            "tomato", "onion", "potato", "cauliflower", "chickpea", "stuffed", "roll",
        ]),
    }
}
