use crate::domain::model::ReferenceAverages;

/// Published district averages for Lima and Callao, PEN per m², April 2025
/// (Urbania index). Used when no reference file is configured.
const LIMA_DISTRICT_AVERAGES_2025_04: [(&str, f64); 23] = [
    ("Barranco", 9486.0),
    ("San Isidro", 9223.0),
    ("Miraflores", 8735.0),
    ("San Borja", 7339.0),
    ("Jesus Maria", 7316.0),
    ("Lince", 7245.0),
    ("Magdalena del Mar", 6890.0),
    ("Santiago de Surco", 6812.0),
    ("Surquillo", 6728.0),
    ("La Victoria", 6642.0),
    ("Pueblo Libre", 6332.0),
    ("San Miguel", 6106.0),
    ("Cercado de Lima", 6081.0),
    ("Chorrillos", 5745.0),
    ("La Molina", 5495.0),
    ("Breña", 5217.0),
    ("Ate", 4631.0),
    ("Bellavista", 4140.0),
    ("La Perla", 4106.0),
    ("Los Olivos", 3641.0),
    ("San Juan de Miraflores", 3583.0),
    ("Callao", 3474.0),
    ("San Martin de Porres", 3015.0),
];

pub fn lima_reference_averages() -> ReferenceAverages {
    LIMA_DISTRICT_AVERAGES_2025_04
        .iter()
        .map(|(district, avg)| (district.to_string(), *avg))
        .collect()
}
