//! Built-in starter content, used until the family saves their own.

use crate::content::{Category, ContentData, Entry};

fn category(rows: &[(&str, &str, &str)]) -> Category {
    rows.iter()
        .map(|(english, spanish, pronunciation)| Entry::new(*english, *spanish, *pronunciation))
        .collect()
}

pub fn vocabulary() -> ContentData {
    let mut data = ContentData::new();
    data.insert(
        "Essential_Greetings".into(),
        category(&[
            ("Hello", "Hola", "OH-lah"),
            ("Good morning", "Buenos días", "BWEH-nohs DEE-ahs"),
            ("Good night", "Buenas noches", "BWEH-nahs NOH-chehs"),
            ("Please", "Por favor", "pohr fah-VOHR"),
            ("Thank you", "Gracias", "GRAH-see-ahs"),
            ("Goodbye", "Adiós", "ah-DYOHS"),
        ]),
    );
    data.insert(
        "Family_Members".into(),
        category(&[
            ("Mom", "Mamá", "mah-MAH"),
            ("Dad", "Papá", "pah-PAH"),
            ("Brother", "Hermano", "ehr-MAH-noh"),
            ("Sister", "Hermana", "ehr-MAH-nah"),
            ("Grandma", "Abuela", "ah-BWEH-lah"),
            ("Grandpa", "Abuelo", "ah-BWEH-loh"),
        ]),
    );
    data.insert(
        "Colors".into(),
        category(&[
            ("Red", "Rojo", "ROH-hoh"),
            ("Blue", "Azul", "ah-SOOL"),
            ("Green", "Verde", "BEHR-deh"),
            ("Yellow", "Amarillo", "ah-mah-REE-yoh"),
            ("White", "Blanco", "BLAHN-koh"),
            ("Black", "Negro", "NEH-groh"),
        ]),
    );
    data.insert(
        "Body_Parts".into(),
        category(&[
            ("Head", "Cabeza", "kah-BEH-sah"),
            ("Hand", "Mano", "MAH-noh"),
            ("Foot", "Pie", "PYEH"),
            ("Eyes", "Ojos", "OH-hohs"),
            ("Nose", "Nariz", "nah-REES"),
        ]),
    );
    data.insert(
        "Food_Basics".into(),
        category(&[
            ("Water", "Agua", "AH-gwah"),
            ("Milk", "Leche", "LEH-cheh"),
            ("Bread", "Pan", "PAHN"),
            ("Apple", "Manzana", "mahn-SAH-nah"),
            ("Rice", "Arroz", "ah-RROHS"),
        ]),
    );
    data.insert(
        "Feelings_Emotions".into(),
        category(&[
            ("Happy", "Feliz", "feh-LEES"),
            ("Sad", "Triste", "TREES-teh"),
            ("Tired", "Cansado", "kahn-SAH-doh"),
            ("Hungry", "Hambriento", "ahm-bree-EHN-toh"),
        ]),
    );
    data.insert(
        "Spatial_Words".into(),
        category(&[
            ("Up", "Arriba", "ah-RREE-bah"),
            ("Down", "Abajo", "ah-BAH-hoh"),
            ("Inside", "Adentro", "ah-DEHN-troh"),
            ("Outside", "Afuera", "ah-FWEH-rah"),
        ]),
    );
    data.insert(
        "Daily_Actions".into(),
        category(&[
            ("To eat", "Comer", "koh-MEHR"),
            ("To sleep", "Dormir", "dohr-MEER"),
            ("To play", "Jugar", "hoo-GAHR"),
            ("To read", "Leer", "leh-EHR"),
        ]),
    );
    data
}

pub fn phrases() -> ContentData {
    let mut data = ContentData::new();
    data.insert(
        "Morning".into(),
        category(&[
            ("Time to wake up", "Hora de despertarse", "OH-rah deh dehs-pehr-TAHR-seh"),
            ("Brush your teeth", "Cepíllate los dientes", "seh-PEE-yah-teh lohs DYEHN-tehs"),
            ("Get dressed", "Vístete", "BEES-teh-teh"),
        ]),
    );
    data.insert(
        "Meals".into(),
        category(&[
            ("Wash your hands", "Lávate las manos", "LAH-bah-teh lahs MAH-nohs"),
            ("Dinner is ready", "La cena está lista", "lah SEH-nah ehs-TAH LEES-tah"),
            ("Do you want more?", "¿Quieres más?", "KYEH-rehs MAHS"),
        ]),
    );
    data.insert(
        "Playtime".into(),
        category(&[
            ("Let's play", "Vamos a jugar", "BAH-mohs ah hoo-GAHR"),
            ("Your turn", "Te toca", "teh TOH-kah"),
            ("Clean up the toys", "Recoge los juguetes", "rreh-KOH-heh lohs hoo-GEH-tehs"),
        ]),
    );
    data.insert(
        "Bedtime".into(),
        category(&[
            ("Time for bed", "Hora de dormir", "OH-rah deh dohr-MEER"),
            ("Sweet dreams", "Dulces sueños", "DOOL-sehs SWEH-nyohs"),
            ("I love you", "Te quiero", "teh KYEH-roh"),
        ]),
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_categories_are_complete_rows() {
        for data in [vocabulary(), phrases()] {
            for (name, category) in &data {
                assert!(!category.is_empty(), "{name} is empty");
                for entry in &category.entries {
                    assert!(!entry.english.is_empty() && !entry.spanish.is_empty());
                }
            }
        }
    }
}
