//! Fixed FIR coefficient tables.
//!
//! All kernels are designed for a 60 Hz sampling rate and are symmetric, so
//! their group delay is `(len - 1) / 2` samples. They are physiology-specific
//! constants: pick one by name through [`FirKernel`], never tune them.

#![allow(clippy::unreadable_literal, clippy::excessive_precision)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named FIR kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FirKernel {
    /// Ballistocardiography band used for heart rate.
    #[default]
    Ballistocardiography,
    /// Low-pass isolating respiration (< 1 Hz).
    LowPassRespiration,
    /// Narrow heart-rate band-pass (0.75-3.0 Hz).
    HeartRateBandPass,
}

impl FirKernel {
    /// Coefficients of this kernel.
    #[must_use]
    pub const fn coefficients(self) -> &'static [f64] {
        match self {
            Self::Ballistocardiography => &BALLISTOCARDIOGRAPHY,
            Self::LowPassRespiration => &LOW_PASS_RESPIRATION,
            Self::HeartRateBandPass => &HEART_RATE_BAND_PASS,
        }
    }

    /// Number of taps, which is also how many samples filtering removes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.coefficients().len()
    }

    /// Always false; every kernel has taps.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.coefficients().is_empty()
    }

    /// Raw window length needed to obtain `output_len` filtered samples.
    #[must_use]
    pub const fn input_len_for(self, output_len: usize) -> usize {
        output_len + self.len()
    }
}

/// Ballistocardiography band, 61 taps.
pub const BALLISTOCARDIOGRAPHY: [f64; 61] = [
    0.011242603325458032, 0.005157445306135791, -0.020243957295231565, -0.04978418439707147,
    -0.05146734321980074, -0.01933178738540511, 0.012640423434563376, 0.011369390979624056,
    -0.011331746140377533, -0.016553072765213617, 0.004257531843301175, 0.017474649529860043,
    0.0011303410151159996, -0.018414952362707314, -0.007667784656641857, 0.017740965170233994,
    0.014966746863089552, -0.014919554924280648, -0.022854933676013246, 0.009199513327732544,
    0.030957851170445427, 0.0004909554223186425, -0.038658009901164324, -0.015813873351272083,
    0.04542105330550204, 0.04102319656541392, -0.05069028461842269, -0.09190143428973485,
    0.054052369911113604, 0.31347691405141814, 0.44480805498222264, 0.31347691405141814,
    0.054052369911113604, -0.09190143428973485, -0.05069028461842269, 0.04102319656541392,
    0.04542105330550204, -0.015813873351272083, -0.038658009901164324, 0.0004909554223186425,
    0.030957851170445427, 0.009199513327732544, -0.022854933676013246, -0.014919554924280648,
    0.014966746863089552, 0.017740965170233994, -0.007667784656641857, -0.018414952362707314,
    0.0011303410151159996, 0.017474649529860043, 0.004257531843301175, -0.016553072765213617,
    -0.011331746140377533, 0.011369390979624056, 0.012640423434563376, -0.01933178738540511,
    -0.05146734321980074, -0.04978418439707147, -0.020243957295231565, 0.005157445306135791,
    0.011242603325458032,
];

/// Respiration low-pass (< 1 Hz at 60 Hz), 93 taps.
pub const LOW_PASS_RESPIRATION: [f64; 93] = [
    -0.0045644380812448395, -0.00042392147736656203, -0.00039921600949020575, -0.0003410784893278681,
    -0.000246559170922285, -0.00011254431170462093, 0.00006433750801042243, 0.0002870933492719704,
    0.000558700907206804, 0.0008818359747837215, 0.0012587683624311434, 0.0016910582068537412,
    0.0021856908690502572, 0.002726710900242062, 0.0033400842043236107, 0.0040111517348650795,
    0.004739077342511737, 0.005524253099514465, 0.006366047547594455, 0.007263122811066336,
    0.008212361291143212, 0.009210018111155885, 0.010251426837018239, 0.011331469979433535,
    0.01244362364387908, 0.013584873647048157, 0.01474370531018102, 0.015917964027590856,
    0.01709913746351596, 0.01827867257835206, 0.01944880098525925, 0.020601194890077695,
    0.02172846305781673, 0.022822065011098805, 0.0238738289199096, 0.02487547673817073,
    0.025819341620558257, 0.026697029918866366, 0.02750356254696736, 0.028230666791627817,
    0.028873750993741547, 0.029427571925871056, 0.029887019803322225, 0.030248790890860813,
    0.030508789150617766, 0.030665772386255268, 0.03071819701905401, 0.030665772386255268,
    0.030508789150617766, 0.030248790890860813, 0.029887019803322225, 0.029427571925871056,
    0.028873750993741547, 0.028230666791627817, 0.02750356254696736, 0.026697029918866366,
    0.025819341620558257, 0.02487547673817073, 0.0238738289199096, 0.022822065011098805,
    0.02172846305781673, 0.020601194890077695, 0.01944880098525925, 0.01827867257835206,
    0.01709913746351596, 0.015917964027590856, 0.01474370531018102, 0.013584873647048157,
    0.01244362364387908, 0.011331469979433535, 0.010251426837018239, 0.009210018111155885,
    0.008212361291143212, 0.007263122811066336, 0.006366047547594455, 0.005524253099514465,
    0.004739077342511737, 0.0040111517348650795, 0.0033400842043236107, 0.002726710900242062,
    0.0021856908690502572, 0.0016910582068537412, 0.0012587683624311434, 0.0008818359747837215,
    0.000558700907206804, 0.0002870933492719704, 0.00006433750801042243, -0.00011254431170462093,
    -0.000246559170922285, -0.0003410784893278681, -0.00039921600949020575, -0.00042392147736656203,
    -0.0045644380812448395,
];

/// Heart-rate band-pass (0.75-3.0 Hz at 60 Hz, Hamming windowed sinc), 241 taps.
pub const HEART_RATE_BAND_PASS: [f64; 241] = [
    -3.9038463097529106e-19, -8.320025896930001e-05, -0.00016210630786159895, -0.0002312474495297055,
    -0.00028574496962722643, -0.00032170051456699477, -0.00033656037836024886, -0.00032942976488327483,
    -0.00030130502926164777, -0.00025518842687267663, -0.00019605081534841636, -0.00013061439328656573,
    -6.69404663837985e-05, -1.38259617438007e-05, 1.996454865862318e-05, 2.6579699006914275e-05,
    -1.560515187599286e-19, -6.309916511590508e-05, -0.00016264369541131162, -0.0002947182721624514,
    -0.00045147316953924026, -0.0006214409964571028, -0.0007902850803417307, -0.0009419540107764178,
    -0.0010601661678085984, -0.001130099701827058, -0.0011401236654317408, -0.0010833807475338938,
    -0.0009590261354923424, -0.0007729434059983517, -0.0005377975976158652, -0.0002723456146504904,
    9.076252602988067e-19, 0.0002532733578327092, 0.00046155885808320344, 0.0006018574922636883,
    0.0006569230220441978, 0.0006177491082158719, 0.0004853960392213723, 0.00027188928034207755,
    -9.076442670175513e-19, -0.00029817570358312993, -0.0005837964600175976, -0.0008148394372465491,
    -0.0009503489445939067, -0.000954968162533101, -0.0008032856775128201, -0.0004835079010942852,
    1.5551283958659556e-18, 0.0006256775840474106, 0.0013554776491912688, 0.0021373910171968917,
    0.0029096680035687545, 0.0036064239574441887, 0.004164141891017293, 0.004528449914656393,
    0.004660472571989234, 0.004542045963665982, 0.004179152881491666, 0.0036030744380256214,
    0.0028689591817198435, 0.0020517621674650947, 0.0012397814162338077, 0.0005262900405401683,
    -5.108232863245234e-19, -0.0002647294773318508, -0.00021693218320714572, 0.00016367724763419463,
    0.0008620585216445503, 0.0018265231085005259, 0.0029711164727518565, 0.0041817308989841595,
    0.005325590845334818, 0.0062633797964085376, 0.00686295468500988, 0.007013357539905242,
    0.006637713855800857, 0.005703622925664437, 0.004229803981201075, 0.0022880562888477982,
    -3.7574520731371756e-18, -0.0024714465869592286, -0.004935372812853577, -0.007189973361224994,
    -0.00904200217006151, -0.010326816305551201, -0.010927066414371342, -0.010788092973672352,
    -0.00992827996457708, -0.00844299179998901, -0.006501249176518444, -0.00433494236663545,
    -0.0022210806177644154, -0.00045826981101228025, 0.0006607690641559277, 0.0008783433156944566,
    -1.584627584669156e-18, -0.0020808596320669812, -0.005364456162891582, -0.009734282175186878,
    -0.014956389242622879, -0.020688990067050966, -0.02650217115838883, -0.03190660631785775,
    -0.03638931501227957, -0.039453801116771284, -0.0406614051311879, -0.03967045896643859,
    -0.03626987706702018, -0.03040415613606958, -0.02218736693926554, -0.011904559496275518,
    6.879142673921742e-18, 0.01294726905700803, 0.026258996375026145, 0.03920191744430318,
    0.051037319754587425, 0.061072219963603507, 0.06870820259788381, 0.07348410375271958,
    0.07510917573950043, 0.07348410375271958, 0.06870820259788381, 0.061072219963603507,
    0.051037319754587425, 0.03920191744430318, 0.026258996375026145, 0.01294726905700803,
    6.879142673921742e-18, -0.011904559496275518, -0.02218736693926554, -0.03040415613606958,
    -0.03626987706702019, -0.03967045896643859, -0.0406614051311879, -0.03945380111677129,
    -0.036389315012279565, -0.03190660631785776, -0.026502171158388835, -0.02068899006705097,
    -0.01495638924262288, -0.009734282175186878, -0.005364456162891583, -0.0020808596320669812,
    -1.5846275846691563e-18, 0.0008783433156944566, 0.0006607690641559277, -0.00045826981101228025,
    -0.0022210806177644154, -0.00433494236663545, -0.006501249176518445, -0.00844299179998901,
    -0.009928279964577083, -0.010788092973672352, -0.010927066414371345, -0.010326816305551205,
    -0.009042002170061512, -0.007189973361224992, -0.004935372812853578, -0.002471446586959228,
    -3.757452073137177e-18, 0.0022880562888477987, 0.004229803981201075, 0.0057036229256644385,
    0.00663771385580086, 0.007013357539905245, 0.006862954685009877, 0.006263379796408536,
    0.005325590845334819, 0.0041817308989841595, 0.0029711164727518565, 0.0018265231085005267,
    0.0008620585216445507, 0.0001636772476341947, -0.00021693218320714572, -0.0002647294773318511,
    -5.108232863245238e-19, 0.0005262900405401683, 0.0012397814162338075, 0.0020517621674650956,
    0.002868959181719845, 0.0036030744380256214, 0.0041791528814916655, 0.0045420459636659844,
    0.004660472571989236, 0.0045284499146563935, 0.0041641418910172935, 0.0036064239574441887,
    0.002909668003568754, 0.0021373910171968913, 0.0013554776491912683, 0.000625677584047411,
    1.555128395865956e-18, -0.0004835079010942852, -0.0008032856775128207, -0.0009549681625331017,
    -0.0009503489445939075, -0.0008148394372465497, -0.0005837964600175978, -0.00029817570358313,
    -9.076442670175513e-19, 0.00027188928034207745, 0.0004853960392213728, 0.0006177491082158723,
    0.0006569230220441979, 0.0006018574922636884, 0.00046155885808320403, 0.0002532733578327094,
    9.076252602988065e-19, -0.00027234561465049024, -0.0005377975976158653, -0.0007729434059983517,
    -0.0009590261354923424, -0.0010833807475338934, -0.0011401236654317414, -0.0011300997018270588,
    -0.0010601661678085986, -0.0009419540107764194, -0.0007902850803417318, -0.0006214409964571026,
    -0.00045147316953924005, -0.00029471827216245167, -0.00016264369541131167, -6.30991651159051e-05,
    -1.5605151875992853e-19, 2.6579699006914302e-05, 1.996454865862319e-05, -1.3825961743800706e-05,
    -6.69404663837985e-05, -0.00013061439328656595, -0.00019605081534841636, -0.00025518842687267663,
    -0.00030130502926164777, -0.00032942976488327505, -0.00033656037836024907, -0.00032170051456699477,
    -0.00028574496962722643, -0.0002312474495297055, -0.00016210630786159895, -8.320025896930001e-05,
    -3.9038463097529106e-19,
];
