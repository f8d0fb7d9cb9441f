use super::{AdvisoryRecord, Pesticide};

pub const LABELS: [&str; 10] = [
	"aphids",
	"armyworm",
	"beetle",
	"bollworm",
	"earthworm",
	"grasshopper",
	"mites",
	"mosquito",
	"sawfly",
	"stem_borer",
];

pub const FALLBACK: AdvisoryRecord = AdvisoryRecord {
	description: "Pest detected",
	treatment: "Consult agricultural expert for treatment",
	pesticide: Pesticide {
		name: "General Insecticide",
		dosage: "As per label",
		category: "Insecticide",
	},
};

pub const ADVISORIES: [(&str, AdvisoryRecord); 10] = [
	(
		"aphids",
		AdvisoryRecord {
			description: "Small soft-bodied insects that feed on plant sap",
			treatment: "Apply Imidacloprid or use biological control with ladybugs",
			pesticide: Pesticide {
				name: "Imidacloprid",
				dosage: "0.5-1 ml/L",
				category: "Systemic Insecticide",
			},
		},
	),
	(
		"armyworm",
		AdvisoryRecord {
			description: "Caterpillars that feed on leaves and can cause severe defoliation",
			treatment: "Apply Chlorantraniliprole or Spinetoram insecticides",
			pesticide: Pesticide {
				name: "Chlorantraniliprole",
				dosage: "150-300 ml/ha",
				category: "Systemic Insecticide",
			},
		},
	),
	(
		"beetle",
		AdvisoryRecord {
			description: "Hard-bodied insects that chew on leaves and stems",
			treatment: "Apply Cypermethrin or use mechanical removal",
			pesticide: Pesticide {
				name: "Cypermethrin",
				dosage: "1-2 ml/L",
				category: "Contact Insecticide",
			},
		},
	),
	(
		"bollworm",
		AdvisoryRecord {
			description: "Caterpillars that bore into cotton bolls and other fruits",
			treatment: "Apply Emamectin benzoate or Profenofos",
			pesticide: Pesticide {
				name: "Emamectin benzoate",
				dosage: "0.5 g/L",
				category: "Systemic Insecticide",
			},
		},
	),
	(
		"earthworm",
		AdvisoryRecord {
			description: "Beneficial organisms that improve soil health",
			treatment: "No treatment needed - earthworms are beneficial for soil",
			pesticide: Pesticide {
				name: "No treatment needed",
				dosage: "N/A",
				category: "Beneficial",
			},
		},
	),
	(
		"grasshopper",
		AdvisoryRecord {
			description: "Jumping insects that feed on leaves and can cause defoliation",
			treatment: "Apply Carbaryl or use biological control with Nosema locustae",
			pesticide: Pesticide {
				name: "Carbaryl",
				dosage: "2-3 g/L",
				category: "Contact Insecticide",
			},
		},
	),
	(
		"mites",
		AdvisoryRecord {
			description: "Tiny arachnids that cause stippling and yellowing of leaves",
			treatment: "Apply Abamectin or increase humidity around plants",
			pesticide: Pesticide {
				name: "Abamectin",
				dosage: "1-2 ml/L",
				category: "Acaricide",
			},
		},
	),
	(
		"mosquito",
		AdvisoryRecord {
			description: "Flying insects; adults are not harmful to plants",
			treatment: "Control breeding sites and use Bt for larvae",
			pesticide: Pesticide {
				name: "Bacillus thuringiensis",
				dosage: "1-2 g/L",
				category: "Biological",
			},
		},
	),
	(
		"sawfly",
		AdvisoryRecord {
			description: "Wasp-like insects whose larvae feed on leaves",
			treatment: "Apply Spinosad or use biological control",
			pesticide: Pesticide {
				name: "Spinosad",
				dosage: "1-2 ml/L",
				category: "Biological Insecticide",
			},
		},
	),
	(
		"stem_borer",
		AdvisoryRecord {
			description: "Caterpillars that bore into plant stems causing wilting",
			treatment: "Apply Chlorantraniliprole or Cartap hydrochloride",
			pesticide: Pesticide {
				name: "Chlorantraniliprole",
				dosage: "150-300 ml/ha",
				category: "Systemic Insecticide",
			},
		},
	),
];
