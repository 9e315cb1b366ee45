//! Fixed page copy: hero, reviews, photo slides, the about timeline and the
//! footer.

/// Hero banner headline.
pub const HERO_TITLE: &str = "Elegance";
pub const HERO_SUBTITLE: &str = "Redefined";

/// Landing tagline section.
pub const TAGLINE: &str = "Where timeless elegance meets sustainable design. \
     Discover pieces that speak to your unique style and values.";

/// Heading above the product carousel.
pub const CRAFTED_HEADING: &str = "Crafted for you:";

pub const REVIEWS_HEADING: &str = "Reviews from our customers:";
pub const REVIEWS_SUBHEADING: &str =
    "Discover what our community has to say about their DevīCo experience";

/// Empty-cart confirmation dialog.
pub const EMPTY_CART_TITLE: &str = "Empty Cart";
pub const EMPTY_CART_PROMPT: &str =
    "Are you sure you want to empty the cart? This action cannot be undone.";

pub const FOOTER_BLURB: &str = "Crafting elegant and sustainable fashion for the modern \
     individual. Every piece tells a story of quality, style, and conscious design.";

/// A customer testimonial.
#[derive(Debug, Clone, Copy)]
pub struct Review {
    pub name: &'static str,
    pub location: &'static str,
    pub rating: u8,
    pub text: &'static str,
}

impl Review {
    /// Filled and empty star glyphs for the rating.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

pub const REVIEWS: [Review; 6] = [
    Review {
        name: "Divesh Baruah",
        location: "San Francisco, CA",
        rating: 5,
        text: "I was in awe of the design and craftsmanship of the clothing , I had the best \
               experience with Devico and I absolutely can't wait to purchase more clothing. \
               Excellent service and excellent clothing.",
    },
    Review {
        name: "Antara Borthakur",
        location: "Austin, TX",
        rating: 5,
        text: "Absolutely love all the dresses.The fabrics feels incredibly soft and breathable, \
               just as described. It's stylish, comfortable, and perfect for any season. \
               Definitely impressed with the quality and fit, looking forward to exploring \
               more pieces from DeviCo!",
    },
    Review {
        name: "Sanjukta",
        location: "New York, NY",
        rating: 5,
        text: "I got the best complements for the fabric. And the print too. The set was my \
               go-to outfit last summer and hopefully this one too.",
    },
    Review {
        name: "Angshuman Kalita",
        location: "Seattle, WA",
        rating: 5,
        text: "Every piece I've purchased feels thoughtfully designed and well-crafted, which \
               really stands out.",
    },
    Review {
        name: "Rupa",
        location: "Miami, FL",
        rating: 5,
        text: "One of the finest designers. She knows me so well. Linen clothes designed perfect \
               to fil us all. She has magic in her hands. I like her creativity. God bless the \
               entire team of DeviCo",
    },
    Review {
        name: "Deekshita Baruah",
        location: "Chicago, IL",
        rating: 5,
        text: "Love the brand for making premium quality sustainable clothing. Love the designs \
               too!",
    },
];

/// One slide of the photo carousel, captioned over two lines.
#[derive(Debug, Clone, Copy)]
pub struct PhotoSlide {
    pub image: &'static str,
    pub line1: &'static str,
    pub line2: &'static str,
}

pub const PHOTO_SLIDES: [PhotoSlide; 6] = [
    PhotoSlide {
        image: "/static/images/photos/brand-labels.png",
        line1: "Signature",
        line2: "Craftsmanship",
    },
    PhotoSlide {
        image: "/static/images/photos/burgundy-dress.png",
        line1: "Contemporary",
        line2: "Style",
    },
    PhotoSlide {
        image: "/static/images/photos/natural-collection.png",
        line1: "Nature-inspired",
        line2: "Design",
    },
    PhotoSlide {
        image: "/static/images/photos/design-process.png",
        line1: "Artistic",
        line2: "Design",
    },
    PhotoSlide {
        image: "/static/images/photos/fabric-detail.png",
        line1: "Luxurious",
        line2: "Textures",
    },
    PhotoSlide {
        image: "/static/images/photos/lifestyle.png",
        line1: "Confident",
        line2: "Style",
    },
];

/// Background videos cycled behind the about page hero.
pub const HERO_VIDEOS: [&str; 3] = [
    "https://res.cloudinary.com/djh25rpnm/video/upload/v1752236583/Banner_Train_FHD_xcrzan.mp4",
    "https://res.cloudinary.com/djh25rpnm/video/upload/v1752239846/Banner_SlowWalk_4K_qqmhzm.mp4",
    "https://res.cloudinary.com/djh25rpnm/video/upload/v1752240055/Banner_LeafGirl_4K_dyg1a3.mp4",
];

/// A company milestone on the about page.
#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub year: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub video: &'static str,
}

pub const TIMELINE: [Milestone; 4] = [
    Milestone {
        year: "2023",
        title: "Company Founded",
        description: "DevīCo was born from a vision to create sustainable, ethically-made fashion \
                      that empowers women while respecting our planet.",
        video: "https://videos.pexels.com/video-files/7564059/7564059-hd_1080_1920_30fps.mp4",
    },
    Milestone {
        year: "2024",
        title: "First Collection Launch",
        description: "Our debut collection featured 12 versatile pieces made from organic cotton \
                      and recycled materials, setting the foundation for our sustainable \
                      approach.",
        video: "https://videos.pexels.com/video-files/8844337/8844337-uhd_1440_2560_30fps.mp4",
    },
    Milestone {
        year: "2025",
        title: "Global Expansion",
        description: "We expanded internationally, bringing our sustainable fashion philosophy to \
                      customers across 15 countries while maintaining our commitment to ethical \
                      manufacturing.",
        video: "https://videos.pexels.com/video-files/5138030/5138030-uhd_1440_2732_25fps.mp4",
    },
    Milestone {
        year: "2026",
        title: "Carbon Neutral Achievement",
        description: "Achieved carbon neutrality across our entire supply chain, from raw \
                      materials to customer delivery, setting a new standard for sustainable \
                      fashion.",
        video: "https://videos.pexels.com/video-files/11208882/11208882-hd_2560_1440_30fps.mp4",
    },
];

/// A value card on the about page.
#[derive(Debug, Clone, Copy)]
pub struct Value {
    pub title: &'static str,
    pub text: &'static str,
}

pub const VALUES: [Value; 3] = [
    Value {
        title: "Sustainability",
        text: "Every piece is crafted with environmentally conscious materials and processes, \
               ensuring minimal impact on our planet.",
    },
    Value {
        title: "Ethical Production",
        text: "We partner with fair-trade manufacturers who share our commitment to worker \
               rights and safe working conditions.",
    },
    Value {
        title: "Quality & Style",
        text: "Timeless designs meet modern aesthetics, creating pieces that are both beautiful \
               and built to last.",
    },
];

/// Footer social links as `(name, url)`.
pub const SOCIAL_LINKS: [(&str, &str); 4] = [
    ("Instagram", "https://instagram.com"),
    ("Facebook", "https://facebook.com"),
    ("Twitter", "https://twitter.com"),
    ("YouTube", "https://youtube.com"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_stars() {
        assert_eq!(REVIEWS[0].stars(), "★★★★★");
        let review = Review {
            rating: 3,
            ..REVIEWS[0]
        };
        assert_eq!(review.stars(), "★★★☆☆");
    }
}
