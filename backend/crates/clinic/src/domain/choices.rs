//! Closed vocabularies of the clinical records
//!
//! Every enum is stored as its `code` (a stable snake_case string) and shown
//! to staff with its Spanish `label`.

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( #[serde(rename = $code)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

choice_enum! {
    /// Dominant foot
    pub enum Laterality {
        Left => ("left", "Zurdo"),
        Right => ("right", "Diestro"),
        Both => ("both", "Ambidiestro"),
    }
}

choice_enum! {
    pub enum HealthInsurance {
        Fonasa => ("fonasa", "FONASA"),
        Isapre => ("isapre", "Isapre"),
        Other => ("other", "Otra"),
    }
}

choice_enum! {
    pub enum TreatmentStatus {
        InTreatment => ("in_treatment", "En tratamiento"),
        Discharged => ("discharged", "Alta médica"),
        Referred => ("referred", "Derivado a especialista"),
        FollowUp => ("follow_up", "Control periódico"),
        Other => ("other", "Otro"),
    }
}

choice_enum! {
    pub enum InjuryType {
        Muscular => ("muscular", "Muscular"),
        Ligament => ("ligament", "Ligamentosa"),
        Bone => ("bone", "Ósea"),
        Tendon => ("tendon", "Tendinosa"),
        Joint => ("joint", "Articular"),
        Meniscus => ("meniscus", "Meniscal"),
        Contusion => ("contusion", "Contusión"),
        Other => ("other", "Otra"),
    }
}

choice_enum! {
    pub enum BodyRegion {
        AnkleLeft => ("ankle_left", "Tobillo Izquierdo"),
        AnkleRight => ("ankle_right", "Tobillo Derecho"),
        KneeLeft => ("knee_left", "Rodilla Izquierda"),
        KneeRight => ("knee_right", "Rodilla Derecha"),
        HipLeft => ("hip_left", "Cadera Izquierda"),
        HipRight => ("hip_right", "Cadera Derecha"),
        ThighFrontLeft => ("thigh_front_left", "Muslo Anterior Izquierdo"),
        ThighFrontRight => ("thigh_front_right", "Muslo Anterior Derecho"),
        ThighBackLeft => ("thigh_back_left", "Muslo Posterior Izquierdo"),
        ThighBackRight => ("thigh_back_right", "Muslo Posterior Derecho"),
        CalfLeft => ("calf_left", "Pantorrilla Izquierda"),
        CalfRight => ("calf_right", "Pantorrilla Derecha"),
        FootLeft => ("foot_left", "Pie Izquierdo"),
        FootRight => ("foot_right", "Pie Derecho"),
        ShoulderLeft => ("shoulder_left", "Hombro Izquierdo"),
        ShoulderRight => ("shoulder_right", "Hombro Derecho"),
        ElbowLeft => ("elbow_left", "Codo Izquierdo"),
        ElbowRight => ("elbow_right", "Codo Derecho"),
        WristLeft => ("wrist_left", "Muñeca Izquierda"),
        WristRight => ("wrist_right", "Muñeca Derecha"),
        HandLeft => ("hand_left", "Mano Izquierda"),
        HandRight => ("hand_right", "Mano Derecha"),
        CervicalSpine => ("cervical_spine", "Columna Cervical"),
        ThoracicSpine => ("thoracic_spine", "Columna Dorsal"),
        LumbarSpine => ("lumbar_spine", "Columna Lumbar"),
        Abdomen => ("abdomen", "Abdomen"),
        Pelvis => ("pelvis", "Pelvis"),
        Head => ("head", "Cabeza"),
        Face => ("face", "Región Facial"),
        Other => ("other", "Otra Región"),
    }
}

choice_enum! {
    pub enum InjuryMechanism {
        Contact => ("contact", "Por contacto"),
        NonContact => ("non_contact", "Sin contacto"),
        Overload => ("overload", "Sobrecarga"),
        Traumatic => ("traumatic", "Traumático"),
        Indirect => ("indirect", "Mecanismo indirecto"),
        Other => ("other", "Otro mecanismo"),
    }
}

choice_enum! {
    pub enum InjuryCondition {
        Acute => ("acute", "Aguda"),
        Chronic => ("chronic", "Crónica"),
        Recurrent => ("recurrent", "Recidivante"),
        Subacute => ("subacute", "Sobreaguda"),
    }
}

choice_enum! {
    /// Point of the season at which the injury happened
    pub enum SportStage {
        Preseason => ("preseason", "Pretemporada"),
        Competition => ("competition", "Competencia"),
        Postseason => ("postseason", "Posttemporada"),
        Training => ("training", "Entrenamiento"),
        OfficialMatch => ("official_match", "Partido oficial"),
        Friendly => ("friendly", "Partido amistoso"),
    }
}

choice_enum! {
    pub enum Severity {
        Mild => ("mild", "Leve (1-7 días)"),
        Moderate => ("moderate", "Moderada (8-28 días)"),
        Severe => ("severe", "Grave (> 28 días)"),
        Surgical => ("surgical", "Severa (requiere cirugía)"),
    }
}

choice_enum! {
    /// Rehabilitation phase logged once per day while an injury is active
    pub enum DailyPhase {
        Stretcher => ("stretcher", "Camilla"),
        Gym => ("gym", "Gimnasio"),
        Reintegration => ("reintegration", "Reintegro"),
    }
}

choice_enum! {
    pub enum FileKind {
        Image => ("image", "Imagen (Radiografía, RMN, Eco)"),
        Report => ("report", "Informe Médico"),
        Other => ("other", "Otro Documento"),
    }
}

choice_enum! {
    pub enum Venue {
        Home => ("home", "Local"),
        Away => ("away", "Visita"),
    }
}

choice_enum! {
    pub enum PainZone {
        Head => ("head", "Cabeza"),
        Neck => ("neck", "Cuello"),
        Shoulder => ("shoulder", "Hombro"),
        Arm => ("arm", "Brazo"),
        Elbow => ("elbow", "Codo"),
        Forearm => ("forearm", "Antebrazo"),
        Wrist => ("wrist", "Muñeca"),
        Hand => ("hand", "Mano"),
        Chest => ("chest", "Tórax"),
        Abdomen => ("abdomen", "Abdomen"),
        Back => ("back", "Espalda"),
        Hip => ("hip", "Cadera"),
        Thigh => ("thigh", "Muslo"),
        Knee => ("knee", "Rodilla"),
        Leg => ("leg", "Pierna"),
        Ankle => ("ankle", "Tobillo"),
        Foot => ("foot", "Pie"),
    }
}

choice_enum! {
    pub enum PainIntensity {
        Mild => ("mild", "Leve"),
        Moderate => ("moderate", "Moderado"),
        Severe => ("severe", "Severo"),
    }
}

choice_enum! {
    pub enum PainMechanism {
        Overload => ("overload", "Sobrecarga"),
        Trauma => ("trauma", "Traumatismo"),
        Contact => ("contact", "Contacto"),
        TechnicalGesture => ("technical_gesture", "Gesto Técnico"),
        Undetermined => ("undetermined", "Indeterminado"),
    }
}

choice_enum! {
    /// When the discomfort first appeared
    pub enum PainOnset {
        FirstHalf => ("first_half", "Primer Tiempo"),
        SecondHalf => ("second_half", "Segundo Tiempo"),
        WarmUp => ("warm_up", "Calentamiento"),
        PostMatch => ("post_match", "Post Partido"),
    }
}
