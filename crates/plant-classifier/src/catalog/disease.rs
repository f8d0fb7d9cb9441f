use super::{AdvisoryRecord, Pesticide};

/// Output order of the disease model. Index `i` of the probability vector is `LABELS[i]`.
pub const LABELS: [&str; 38] = [
	"Apple_scab",
	"Apple_Black_rot",
	"Apple_Cedar_apple_rust",
	"Apple_healthy",
	"Blueberry_healthy",
	"Cherry_Powdery_mildew",
	"Cherry_healthy",
	"Corn_Cercospora_leaf_spot",
	"Corn_Common_rust",
	"Corn_Northern_Leaf_Blight",
	"Corn_healthy",
	"Grape_Black_rot",
	"Grape_Esca",
	"Grape_Leaf_blight",
	"Grape_healthy",
	"Orange_Haunglongbing",
	"Peach_Bacterial_spot",
	"Peach_healthy",
	"Pepper_Bacterial_spot",
	"Pepper_healthy",
	"Potato_Early_blight",
	"Potato_Late_blight",
	"Potato_healthy",
	"Raspberry_healthy",
	"Soybean_healthy",
	"Squash_Powdery_mildew",
	"Strawberry_Leaf_scorch",
	"Strawberry_healthy",
	"Tomato_Bacterial_spot",
	"Tomato_Early_blight",
	"Tomato_Late_blight",
	"Tomato_Leaf_Mold",
	"Tomato_Septoria_leaf_spot",
	"Tomato_Spider_mites",
	"Tomato_Target_Spot",
	"Tomato_Yellow_Leaf_Curl_Virus",
	"Tomato_mosaic_virus",
	"Tomato_healthy",
];

pub const FALLBACK: AdvisoryRecord = AdvisoryRecord {
	description: "Disease detected",
	treatment: "Consult agricultural expert for treatment",
	pesticide: Pesticide {
		name: "General Fungicide",
		dosage: "As per label",
		category: "Fungicide",
	},
};

/// Replaces whatever the table says for any label containing "healthy".
pub const HEALTHY: AdvisoryRecord = AdvisoryRecord {
	description: "Plant appears healthy",
	treatment: "Continue regular care and monitoring",
	pesticide: Pesticide {
		name: "No treatment needed",
		dosage: "N/A",
		category: "N/A",
	},
};

const fn fungicide(name: &'static str, dosage: &'static str) -> Pesticide {
	Pesticide {
		name,
		dosage,
		category: "Fungicide",
	}
}

pub const ADVISORIES: [(&str, AdvisoryRecord); 9] = [
	(
		"Apple_scab",
		AdvisoryRecord {
			description: "Fungal disease causing dark, scaly lesions on leaves and fruit",
			treatment: "Apply fungicides like Mancozeb or Copper sulfate",
			pesticide: fungicide("Mancozeb", "2-3 g/L"),
		},
	),
	(
		"Apple_Black_rot",
		AdvisoryRecord {
			description: "Fungal disease causing black cankers on branches and fruit rot",
			treatment: "Prune infected areas and apply Captan or Thiophanate-methyl",
			pesticide: fungicide("Captan", "2-3 g/L"),
		},
	),
	(
		"Apple_Cedar_apple_rust",
		AdvisoryRecord {
			description: "Fungal disease causing yellow-orange spots on leaves",
			treatment: "Apply Propiconazole or Myclobutanil fungicides",
			pesticide: fungicide("Propiconazole", "1-2 ml/L"),
		},
	),
	(
		"Corn_Cercospora_leaf_spot",
		AdvisoryRecord {
			description: "Fungal disease causing small rectangular lesions on leaves",
			treatment: "Apply Azoxystrobin or Tebuconazole fungicides",
			pesticide: fungicide("Azoxystrobin", "1-1.5 ml/L"),
		},
	),
	(
		"Corn_Common_rust",
		AdvisoryRecord {
			description: "Fungal disease causing small oval rust pustules on leaves",
			treatment: "Apply Chlorothalonil or Propiconazole fungicides",
			pesticide: fungicide("Chlorothalonil", "2-3 ml/L"),
		},
	),
	(
		"Corn_Northern_Leaf_Blight",
		AdvisoryRecord {
			description: "Fungal disease causing large grayish-green lesions on leaves",
			treatment: "Apply Mancozeb or Azoxystrobin fungicides",
			pesticide: fungicide("Mancozeb", "2-3 g/L"),
		},
	),
	(
		"Tomato_Early_blight",
		AdvisoryRecord {
			description: "Fungal disease causing brown spots with concentric rings on leaves",
			treatment: "Apply Chlorothalonil or Mancozeb fungicides",
			pesticide: fungicide("Chlorothalonil", "2-3 ml/L"),
		},
	),
	(
		"Tomato_Late_blight",
		AdvisoryRecord {
			description: "Devastating fungal disease causing water-soaked lesions",
			treatment: "Apply Metalaxyl or Copper-based fungicides immediately",
			pesticide: fungicide("Metalaxyl", "2-3 g/L"),
		},
	),
	(
		"Tomato_Leaf_Mold",
		AdvisoryRecord {
			description: "Fungal disease causing yellow patches on upper leaf surface",
			treatment: "Improve air circulation and apply Chlorothalonil",
			pesticide: fungicide("Chlorothalonil", "2-3 ml/L"),
		},
	),
];
