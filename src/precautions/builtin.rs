//! Built-in precaution table.

use super::{PrecautionBook, PrecautionEntry};

/// Advice used when a label matches no entry.
pub const GENERIC_PRECAUTIONS: [&str; 6] = [
    "Consult a healthcare professional immediately for proper diagnosis and treatment",
    "Follow your doctor's prescribed treatment plan carefully",
    "Monitor your symptoms and seek medical attention if they worsen",
    "Take prescribed medications exactly as directed",
    "Get adequate rest and maintain proper nutrition",
    "Stay hydrated and avoid self-medication",
];

struct Row {
    disease: &'static str,
    advice: &'static [&'static str],
    somali: Option<(&'static str, &'static [&'static str])>,
}

const TABLE: &[Row] = &[
    Row {
        disease: "Pneumonia",
        advice: &[
            "Take prescribed antibiotics or antiviral medications as directed by your doctor",
            "Get plenty of rest and avoid strenuous activities",
            "Drink plenty of fluids to stay hydrated and help loosen mucus",
            "Use a humidifier or breathe steam from a hot shower to ease breathing",
            "Avoid smoking and exposure to secondhand smoke",
            "Follow up with your healthcare provider as recommended",
        ],
        somali: None,
    },
    Row {
        disease: "Malaria",
        advice: &[
            "Take antimalarial medications exactly as prescribed by your doctor",
            "Use mosquito nets while sleeping, especially during night hours",
            "Apply insect repellent containing DEET to exposed skin",
            "Wear long-sleeved clothing and long pants during evening and night",
            "Seek immediate medical attention if symptoms worsen",
            "Complete the full course of treatment even if you feel better",
        ],
        somali: Some((
            "Malaria",
            &[
                "Isticmaal shabkada kaneecada habeenkii, gaar ahaan meelaha kulaylaha ah.",
                "Ka fogow meelaha kaneecadu ku badan tahay, gaar ahaan xilliga habeenkii iyo qorrax dhaca.",
                "Xidho dhar dhaadheer oo jidhkaaga daboolaya markaad dibadda joogtid habeenkii.",
                "Qaado dawooyinka ka hortagga duumada haddii aad u safrayso meelaha khatarta sare leh.",
                "Daawoyinka caadiga ah: 'Aremether-Lumefantrine' ama 'Coartem' waa daawaynta safka koowaad ee duumada falciparum.",
            ],
        )),
    },
    Row {
        disease: "Diabetes",
        advice: &[
            "Monitor your blood sugar levels regularly as advised by your healthcare provider",
            "Follow a balanced diet and control carbohydrate intake",
            "Take prescribed medications (insulin or oral drugs) consistently",
            "Engage in regular physical activity as recommended by your doctor",
            "Check your feet daily for cuts, sores, or signs of infection",
            "Schedule regular check-ups for eye, kidney, and foot examinations",
        ],
        somali: Some((
            "Sonkorowga",
            &[
                "Cun cunto caafimaad leh oo ay sonkortu ku yar tahay, oo ay ku jiraan khudaarta, khudaarta khafiifka ah ee macaan, iyo miraha oo dhan.",
                "Si joogto ah u samee jimicsi sida socodka, orodka, ama yoga si aad u caawiso hoos u dhigista sonkorta dhiiga.",
                "Ka fogow nacnaca, cabitaanada sonkorta leh, iyo rootiga cad.",
                "La soco heerka sonkorta dhiigga maalin kasta haddii aad qabto nooca 1 ama 2 diabetes.",
                "Raac talada dhakhtarkaaga oo qaado daawooyinka sida 'Metformin' ama insulin haddii laguu qoro.",
            ],
        )),
    },
    Row {
        disease: "Common Cold",
        advice: &[
            "Get adequate rest to help your body recover",
            "Stay well hydrated by drinking water, herbal teas, or warm broths",
            "Use a humidifier or inhale steam to relieve congestion",
            "Gargle with warm salt water to soothe a sore throat",
            "Wash hands frequently to prevent spreading the infection",
            "Avoid close contact with others to prevent transmission",
        ],
        somali: Some((
            "Qawowga caadiga ah",
            &[
                "Hel nasasho badan iyo hurdo kugu filan si aad jidhkaaga uga caawiso inuu soo kabsado.",
                "Cab cabitaanno, maraq diirran, iyo cabitaan kulul si aad cunaha u dejiso.",
                "Ka fogow dadka qabo hargab ama hargab si loo yareeyo khatarta caabuqa.",
                "Dabooli sankaaga iyo afkaaga markaad hindhiso ama qufacayso.",
                "Daawoyinka: 'Paracetamol' ama 'Ibuprofen' si loo yareeyo qandhada iyo xanuunka. Isticmaal 'Antihistamines' haddii ay jiraan dheecaan badan oo sanka ah.",
            ],
        )),
    },
    Row {
        disease: "Migraine",
        advice: &[
            "Take prescribed migraine medications at the first sign of symptoms",
            "Rest in a quiet, dark, and cool room during an attack",
            "Apply a cold compress to your forehead or temples",
            "Identify and avoid known migraine triggers",
            "Maintain regular sleep and eating schedules",
            "Stay hydrated and manage stress levels",
        ],
        somali: Some((
            "Migraine",
            &[
                "Ka fogow waxyaabaha keena xanuunka dhanjafka sida qaylada dheer, nalalka ifaya, iyo hurdo la'aanta.",
                "Isticmaal farsamooyinka fududaynta cadaadiska sida yoga ama neefsashada qoto dheer.",
                "Cab biyo badan si aad uga hortagto fuuqbaxa.",
                "Daawooyinka: 'Paracetamol', 'Ibuprofen', ama 'Sumatriptan' ee xanuunka dhanjafka.",
                "Ka fogow cuntooyinka kicinaya sida shukulaatada, jiiska da'da ah, iyo kafeyn xad dhaaf ah.",
            ],
        )),
    },
    Row {
        disease: "Bronchitis",
        advice: &[
            "Avoid smoking to protect your lungs",
            "Eat nutritious food rich in protein and vitamins C and D to support your immune system",
            "Wash your hands regularly, especially before meals and when coming home",
            "Get pneumococcal and influenza vaccinations to prevent respiratory infections",
            "Treatment may include 'Amoxicillin', 'Azithromycin' or 'Ceftriaxone' depending on severity",
        ],
        somali: Some((
            "Burunkiito",
            &[
                "Ka fogow sigaar cabista si aad u ilaaliso sambabkaaga.",
                "Cun cunto nafaqo leh si aad u xoojiso habka difaaca jirka (cuntooyinka qani ku ah borotiinka, fitamiin C iyo D)",
                "Gacmaha si joogto ah u dhaq, gaar ahaan cuntada ka hor ama markaad guriga soo galayso.",
                "Tallaalka 'Pneumococcal' iyo 'hargabka' waa muhiim si looga hortago caabuqyada neef-mareenka.",
                "Daawaynta: 'Amoxicillin', 'Azithromycin', ama 'Ceftriaxone' iyadoo ku xiran darnaanta.",
            ],
        )),
    },
    Row {
        disease: "Urinary Tract Infection",
        advice: &[
            "Drink plenty of water to help flush bacteria from the urinary tract",
            "Urinate as soon as you feel the urge so bacteria cannot multiply",
            "Urinate after sexual activity to clear the urinary tract",
            "Wear clean cotton underwear and avoid tight clothing that traps moisture",
            "Treatment may include 'Nitrofurantoin', 'Trimethoprim-sulfamethoxazole' or 'Ciprofloxacin'",
        ],
        somali: Some((
            "Infekshanka kaadi mareenka",
            &[
                "Cab biyo badan si ay kaaga caawiyaan nadiifinta bakteeriyada kaadi mareenka.",
                "Kaadi isla marka aad dareento rabitaanka ka hortagga bakteeriyada inay tarmaan.",
                "Kaadi ka dib dhaqdhaqaaqa galmada si aad u nadiifiso mareenka kaadida.",
                "Xirso nigisyada suufka nadiifka ah kana fogow dharka ku dheggan ee dabinta qoyaanka.",
                "Daawooyinka: 'Nitrofurantoin', 'Trimethoprim-sulfamethoxazole', ama 'Ciprofloxacin'.",
            ],
        )),
    },
    Row {
        disease: "Typhoid",
        advice: &[
            "Drink boiled or filtered water to avoid 'Salmonella Typhi' bacteria",
            "Avoid street food that may not be prepared hygienically",
            "Eat food that is well cooked and properly prepared",
            "Wash your hands with soap before eating and after using the toilet",
            "Treatment may include 'Ceftriaxone', 'Azithromycin' or 'Ciprofloxacin'",
        ],
        somali: Some((
            "Typhoid",
            &[
                "Cab biyo la karkariyey ama la sifeeyey si aad uga fogaato bakteeriyada 'Salmonella Typhi'.",
                "Ka fogow cuntada waddooyinka ee laga yaabo inaysan nadaafad ahaan ahayn.",
                "Cun cunto si fiican loo kariyey oo si fiican loo diyaariyey.",
                "Ku dhaq gacmaha saabuun ka hor intaadan cunin iyo ka dib markaad musqusha isticmaasho.",
                "Daawooyinka: 'Ceftriaxone', 'Azithromycin', ama 'Ciprofloxacin'.",
            ],
        )),
    },
    Row {
        disease: "Fungal Infection",
        advice: &[
            "Wear clean, dry clothes, especially over damp areas such as the armpits and groin",
            "Clean your body daily with a mild soap",
            "Do not share personal items such as shoes or towels",
            "Treatment may include 'Clotrimazole', 'Miconazole' or 'Fluconazole' depending on the infection",
            "Avoid walking barefoot in damp places such as public showers or swimming pools",
        ],
        somali: Some((
            "Infekshanka fungal",
            &[
                "Xidho dhar nadiif ah oo qalalan gaar ahaan meelaha qoyan sida cududaha iyo gumaarka.",
                "Nadiifi jidhkaaga maalin kasta adigoo isticmaalaya saabuun aan xanaaq lahayn.",
                "Ka fogow wadaagida alaabta gaarka ah sida kabaha ama tuwaalada.",
                "Daawaynta: 'Clotrimazole', 'Miconazole', ama 'Fluconazole' taas oo ku xidhan nooca caabuqa.",
                "Ka fogow inaad cagaha la'aan ku socotid meelaha qoyan sida musqulaha dadweynaha ama barkadaha dabaasha.",
            ],
        )),
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The table shipped with the crate.
pub fn builtin_book() -> PrecautionBook {
    let entries = TABLE
        .iter()
        .map(|row| PrecautionEntry {
            disease: row.disease.to_owned(),
            advice: owned(row.advice),
            somali_name: row.somali.map(|(name, _)| name.to_owned()),
            somali_advice: row.somali.map(|(_, advice)| owned(advice)),
        })
        .collect();
    PrecautionBook {
        entries,
        generic: owned(&GENERIC_PRECAUTIONS),
    }
}
